use anyhow::Result;

use super::{load_with_spinner, no_data_message, output_path, pipeline_config};
use crate::{cli::WindArgs, output, pipeline, reading::WindReadings};

pub fn wind(args: &WindArgs) -> Result<String> {
    let mut config = pipeline_config(&args.pipeline)?;
    config.accepted_flag = args.wind.flag.clone();

    let readings: WindReadings = load_with_spinner(&args.file, "wind", &config)?;
    let result = pipeline::run_wind(&readings, &config)?;
    if result.is_empty() {
        return Ok(no_data_message("wind", &config));
    }

    let format = args.pipeline.format;
    let vectors_path = output_path(&args.pipeline, "wind-vectors")?;
    let lines_path = output_path(&args.pipeline, "wind-series")?;
    output::save_vectors(&result.vectors, config.timezone, &vectors_path, format)?;
    output::save_lines(&result.lines, config.timezone, &lines_path, format)?;

    Ok(format!(
        "{} wind vectors saved to `{}`\nWind speed and temperature saved to `{}`\n\
         Quality filter: {} accepted ({} calm), {} rejected by flag, {} malformed",
        result.vectors.len(),
        vectors_path.display(),
        lines_path.display(),
        result.report.accepted,
        result.report.calm,
        result.report.rejected_flag,
        result.report.malformed
    ))
}

// -- Tests -------------------------------------------------------------------
