//! File + range + frequency in, plot-ready series out.

use crate::{
    config::PipelineConfig,
    error::RowDiagnostics,
    reading::{AodReadings, WindReadings},
    series::{select_range, ResampleError, ResampledSeries, Series},
    vector::{
        filter_valid, resample_vectors, speed_series, CartesianSample, FilterReport, ValidWind,
        VectorBucket,
    },
};

#[derive(Debug, Clone)]
pub struct AodOutput {
    pub lines: Vec<ResampledSeries>,
    pub diagnostics: RowDiagnostics,
}

#[derive(Debug, Clone)]
pub struct WindOutput {
    pub vectors: Vec<VectorBucket>,
    pub lines: Vec<ResampledSeries>,
    pub report: FilterReport,
    pub diagnostics: RowDiagnostics,
}

impl AodOutput {
    /// True when the selection left nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.buckets.is_empty())
    }
}

impl WindOutput {
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty() && self.lines.iter().all(|l| l.buckets.is_empty())
    }
}

fn select_and_resample(
    series: &Series,
    config: &PipelineConfig,
) -> Result<ResampledSeries, ResampleError> {
    let selected = match &config.range {
        Some(range) => select_range(series, range),
        None => series.clone(),
    };
    if selected.is_empty() {
        log::debug!("{}: no samples selected", selected.name());
    } else {
        log::debug!("{}: {} samples selected", selected.name(), selected.len());
    }

    ResampledSeries::from_series(&selected, config.frequency)
}

pub fn run_aod(
    readings: &AodReadings,
    config: &PipelineConfig,
) -> Result<AodOutput, ResampleError> {
    let lines = readings
        .series
        .iter()
        .map(|s| select_and_resample(s, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AodOutput {
        lines,
        diagnostics: readings.diagnostics.clone(),
    })
}

pub fn run_wind(
    readings: &WindReadings,
    config: &PipelineConfig,
) -> Result<WindOutput, ResampleError> {
    let (valid, report) = filter_valid(&readings.observations, &config.accepted_flag);
    log::info!(
        "wind quality filter: {} accepted ({} calm), {} rejected by flag, {} malformed",
        report.accepted,
        report.calm,
        report.rejected_flag,
        report.malformed
    );

    let in_range: Vec<ValidWind> = valid
        .into_iter()
        .filter(|w| config.in_range(&w.timestamp))
        .collect();
    let cartesian: Vec<CartesianSample> = in_range.iter().map(ValidWind::to_cartesian).collect();
    let vectors = resample_vectors(&cartesian, config.frequency)?;

    let mut lines = vec![select_and_resample(
        &speed_series(&in_range, config.timezone),
        config,
    )?];
    if let Some(temperature) = &readings.temperature {
        lines.push(select_and_resample(temperature, config)?);
    }

    Ok(WindOutput {
        vectors,
        lines,
        report,
        diagnostics: readings.diagnostics.clone(),
    })
}

// -- Tests -------------------------------------------------------------------
