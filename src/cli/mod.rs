//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use chrono_tz::Tz;
use clap::{command, Args, Parser, Subcommand};
use indicatif::ProgressBar;

use crate::{
    config::{DEFAULT_ACCEPTED_FLAG, DEFAULT_SKIP_ROWS},
    output::OutputFormat,
    series::{CivilBound, Frequency},
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resample an AERONET aerosol optical depth file
    Aod(AodArgs),
    /// Resample a NOAA ISD wind file into vectors and line series
    Wind(WindArgs),
    /// Resample AOD and wind files onto the same range and grid
    Overlay(OverlayArgs),
}

/// Range, grid and output options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// First civil date or date-time to include (YYYY-MM-DD[THH:MM[:SS]])
    #[arg(long, requires = "end")]
    pub start: Option<CivilBound>,
    /// Last civil date or date-time to include; a date covers the whole day
    #[arg(long, requires = "start")]
    pub end: Option<CivilBound>,
    /// Resampling frequency, e.g. 30min, 1h, 3h, 1d
    #[arg(long, default_value = "1h")]
    pub freq: Frequency,
    /// Civil timezone for selection and labels
    #[arg(long, default_value = "US/Pacific", value_parser = parse_timezone)]
    pub tz: Tz,
    #[arg(long, value_enum, default_value_t = OutputFormat::Parquet)]
    pub format: OutputFormat,
    /// Output file; defaults to a dated file in the home directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AodOptions {
    /// AOD columns to keep, e.g. AOD_500nm (defaults to 380, 500 and 870 nm)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
    /// Preamble lines before the header row
    #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
    pub skip_rows: usize,
}

#[derive(Args, Debug, Clone)]
pub struct WindOptions {
    /// Quality code accepted as "passed"
    #[arg(long, default_value = DEFAULT_ACCEPTED_FLAG)]
    pub flag: String,
}

#[derive(Args, Debug, Clone)]
pub struct AodArgs {
    /// AERONET AOD file
    #[arg(long)]
    pub file: PathBuf,
    #[command(flatten)]
    pub aod: AodOptions,
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WindArgs {
    /// NOAA ISD CSV file
    #[arg(long)]
    pub file: PathBuf,
    #[command(flatten)]
    pub wind: WindOptions,
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OverlayArgs {
    /// AERONET AOD file
    #[arg(long)]
    pub aod: PathBuf,
    /// NOAA ISD CSV file
    #[arg(long)]
    pub wind: PathBuf,
    #[command(flatten)]
    pub aod_options: AodOptions,
    #[command(flatten)]
    pub wind_options: WindOptions,
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

fn parse_timezone(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>().map_err(|e| e.to_string())
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

// -- Tests -------------------------------------------------------------------
