//! Writes plot-ready series and vectors to disk.

pub mod csv;
pub mod parquet;

use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::ValueEnum;

use crate::{series::ResampledSeries, vector::VectorBucket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

pub fn save_lines(
    lines: &[ResampledSeries],
    tz: Tz,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Parquet => parquet::save_lines(lines, tz, path),
        OutputFormat::Csv => csv::save_lines(lines, path),
    }
    .with_context(|| format!("writing series to `{}`", path.display()))
}

pub fn save_vectors(
    vectors: &[VectorBucket],
    tz: Tz,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Parquet => parquet::save_vectors(vectors, tz, path),
        OutputFormat::Csv => csv::save_vectors(vectors, path),
    }
    .with_context(|| format!("writing vectors to `{}`", path.display()))
}
