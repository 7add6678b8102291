use anyhow::Result;

use super::{load_with_spinner, make_output_file_name, no_data_message, pipeline_config};
use crate::{cli::AodArgs, output, pipeline, reading::AodReadings};

pub fn aod(args: &AodArgs) -> Result<String> {
    let mut config = pipeline_config(&args.pipeline)?;
    config.aod_columns = args.aod.columns.clone();
    config.skip_rows = args.aod.skip_rows;

    let readings: AodReadings = load_with_spinner(&args.file, "AOD", &config)?;
    let result = pipeline::run_aod(&readings, &config)?;
    if result.is_empty() {
        return Ok(no_data_message("AOD", &config));
    }

    let path = match &args.pipeline.output {
        Some(path) => path.clone(),
        None => make_output_file_name("aod", args.pipeline.format)?,
    };
    output::save_lines(&result.lines, config.timezone, &path, args.pipeline.format)?;

    Ok(format!(
        "{} AOD series at {} saved to `{}`",
        result.lines.len(),
        config.frequency,
        path.display()
    ))
}

// -- Tests -------------------------------------------------------------------
