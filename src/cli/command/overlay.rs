//! AOD lines and wind vectors on one range and grid, ready to be drawn
//! on shared axes.

use anyhow::Result;

use super::{load_with_spinner, no_data_message, output_path, pipeline_config};
use crate::{
    cli::OverlayArgs,
    output,
    pipeline,
    reading::{AodReadings, WindReadings},
};

pub fn overlay(args: &OverlayArgs) -> Result<String> {
    let mut config = pipeline_config(&args.pipeline)?;
    config.aod_columns = args.aod_options.columns.clone();
    config.skip_rows = args.aod_options.skip_rows;
    config.accepted_flag = args.wind_options.flag.clone();

    let aod: AodReadings = load_with_spinner(&args.aod, "AOD", &config)?;
    let wind: WindReadings = load_with_spinner(&args.wind, "wind", &config)?;

    let aod_result = pipeline::run_aod(&aod, &config)?;
    let wind_result = pipeline::run_wind(&wind, &config)?;
    if aod_result.is_empty() && wind_result.is_empty() {
        return Ok(no_data_message("AOD or wind", &config));
    }

    let mut lines = aod_result.lines;
    lines.extend(wind_result.lines);

    let format = args.pipeline.format;
    let lines_path = output_path(&args.pipeline, "overlay-series")?;
    let vectors_path = output_path(&args.pipeline, "overlay-vectors")?;
    output::save_lines(&lines, config.timezone, &lines_path, format)?;
    output::save_vectors(&wind_result.vectors, config.timezone, &vectors_path, format)?;

    Ok(format!(
        "{} series saved to `{}`\n{} wind vectors saved to `{}`",
        lines.len(),
        lines_path.display(),
        wind_result.vectors.len(),
        vectors_path.display()
    ))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::cli::{Cli, Commands};

    const AOD_FILE: &str = "line 1\nline 2\nline 3\nline 4\nline 5\nline 6\n\
        Date(dd:mm:yyyy),Time(hh:mm:ss),AOD_500nm\n\
        01:08:2024,18:05:00,0.25\n\
        01:08:2024,20:40:00,0.75\n";

    const ISD_FILE: &str = "\"STATION\",\"DATE\",\"SOURCE\",\"WND\"\n\
        \"72389093193\",\"2024-08-01T18:00:00\",\"4\",\"090,1,N,0050,5\"\n\
        \"72389093193\",\"2024-08-01T19:00:00\",\"4\",\"000,1,N,0050,5\"\n";

    #[test]
    fn should_share_grid_between_sources() {
        let dir = TempDir::new().unwrap();
        let aod_path = dir.path().join("fresno.lev15");
        let wind_path = dir.path().join("isd.csv");
        let output = dir.path().join("overlay.csv");
        fs::write(&aod_path, AOD_FILE).unwrap();
        fs::write(&wind_path, ISD_FILE).unwrap();

        let cli = Cli::try_parse_from([
            "aodwind",
            "overlay",
            "--aod",
            aod_path.to_str().unwrap(),
            "--wind",
            wind_path.to_str().unwrap(),
            "--start",
            "2024-08-01T11:00",
            "--end",
            "2024-08-01T13:59",
            "--format",
            "csv",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        let Commands::Overlay(args) = cli.command else {
            panic!("expected overlay command");
        };

        let message = overlay(&args).unwrap();
        assert!(message.starts_with("2 series saved"));

        let series = fs::read_to_string(dir.path().join("overlay-overlay-series.csv")).unwrap();
        assert!(series.contains("2024-08-01T11:00:00-07:00,AOD_500nm,0.25\n"));
        assert!(series.contains("2024-08-01T12:00:00-07:00,AOD_500nm,\n"));
        assert!(series.contains("2024-08-01T13:00:00-07:00,AOD_500nm,0.75\n"));
        assert!(series.contains("2024-08-01T11:00:00-07:00,wind_speed,5\n"));

        let vectors = fs::read_to_string(dir.path().join("overlay-overlay-vectors.csv")).unwrap();
        assert_eq!(vectors.lines().count(), 3);
        assert!(vectors.contains("2024-08-01T11:00:00-07:00,5,"));
    }
}
