pub mod aod;
pub mod overlay;
pub mod wind;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};

pub use aod::aod;
pub use overlay::overlay;
pub use wind::wind;

use crate::{
    cli::{create_spinner, PipelineArgs},
    config::PipelineConfig,
    error::DataLoadError,
    output::OutputFormat,
    reading::{self, Reading},
    series::TimeRange,
};

pub fn make_output_file_name(kind: &str, format: OutputFormat) -> Result<PathBuf> {
    let today = Local::now();
    let file_name = format!(
        "aodwind-{}-{}-{:02}-{:02}.{}",
        kind,
        today.year(),
        today.month(),
        today.day(),
        format.extension()
    );

    let home = dirs::home_dir().context("cannot locate the home directory")?;
    Ok(home.join(file_name))
}

/// `out.parquet` + `vectors` -> `out-vectors.parquet`
pub fn sibling_path(base: &Path, kind: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "aodwind".to_string());
    let file_name = match base.extension() {
        Some(ext) => format!("{}-{}.{}", stem, kind, ext.to_string_lossy()),
        None => format!("{}-{}", stem, kind),
    };

    base.with_file_name(file_name)
}

/// Output path for one of several files a command writes.
pub fn output_path(args: &PipelineArgs, kind: &str) -> Result<PathBuf> {
    match &args.output {
        Some(base) => Ok(sibling_path(base, kind)),
        None => make_output_file_name(kind, args.format),
    }
}

pub fn pipeline_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let range = match (args.start, args.end) {
        (Some(start), Some(end)) => Some(TimeRange::from_civil(start, end, args.tz)?),
        _ => None,
    };

    Ok(PipelineConfig {
        range,
        frequency: args.freq,
        timezone: args.tz,
        ..Default::default()
    })
}

/// Loads a file behind a spinner and logs skipped rows.
pub fn load_with_spinner<R: Reading>(
    path: &Path,
    label: &str,
    config: &PipelineConfig,
) -> Result<R> {
    let bar = create_spinner(format!("Reading {} file...", label));
    let loaded: Result<R, DataLoadError> = reading::load(path, config);

    match loaded {
        Ok(readings) => {
            let diag = readings.diagnostics();
            bar.finish_with_message(format!("{} file read: {}", label, diag));
            diag.log_summary(&path.display().to_string());
            Ok(readings)
        }
        Err(e) => {
            bar.finish_and_clear();
            Err(e).with_context(|| format!("loading {} file `{}`", label, path.display()))
        }
    }
}

pub fn no_data_message(label: &str, config: &PipelineConfig) -> String {
    match &config.range {
        Some(range) => format!("No {} data in range {}", label, range),
        None => format!("No {} data in file", label),
    }
}

// -- Tests -------------------------------------------------------------------
