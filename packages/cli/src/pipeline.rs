//! Load -> normalize -> aggregate -> regress -> export.
//!
//! Each stage takes the previous stage's output and returns a new value;
//! nothing is mutated in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use nyc_shootings_analytics::AnalyticsError;
use nyc_shootings_analytics::export::{self, ExportFormat};
use nyc_shootings_analytics::regression::OrdinaryLeastSquares;
use nyc_shootings_analytics_models::{DatasetSummary, Report};
use nyc_shootings_source::SourceError;
use nyc_shootings_source::dataset::DatasetDefinition;
use nyc_shootings_source::progress::ProgressCallback;
use nyc_shootings_source::{loader, normalize, registry};
use nyc_shootings_source_models::Incident;
use thiserror::Error;

/// Errors from any pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading, validation, or normalization failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Export failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Settings for a full summarize run.
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    /// Dataset id; inferred from the input extension when `None`.
    pub dataset: Option<String>,
}

/// Result of a full summarize run.
#[derive(Debug)]
pub struct SummarizeOutcome {
    pub report: Report,
    pub written: Vec<PathBuf>,
}

fn resolve_dataset(input: &Path, dataset: Option<&str>) -> Result<DatasetDefinition, SourceError> {
    dataset.map_or_else(|| registry::dataset_for_path(input), registry::find_dataset)
}

/// Loads and normalizes `input`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read, its columns do not
/// match the dataset, or a required value does not parse.
pub fn load_incidents(
    input: &Path,
    dataset: Option<&str>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<Incident>, SourceError> {
    let dataset = resolve_dataset(input, dataset)?;
    log::info!("Reading {} as dataset {}", input.display(), dataset.id);

    let table = loader::load_path(input, progress)?;
    normalize::normalize_with(&table, &dataset)
}

/// Loads and normalizes `input` without writing anything.
///
/// # Errors
///
/// See [`load_incidents`].
pub fn validate(
    input: &Path,
    dataset: Option<&str>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<DatasetSummary, SourceError> {
    let incidents = load_incidents(input, dataset, progress)?;
    Ok(nyc_shootings_analytics::queries::summarize(&incidents))
}

/// Runs the full pipeline and writes every table to the output directory.
///
/// # Errors
///
/// Returns [`PipelineError`] if loading, normalization, or export fails.
pub fn summarize(
    config: &SummarizeConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<SummarizeOutcome, PipelineError> {
    let start = Instant::now();

    let incidents = load_incidents(&config.input, config.dataset.as_deref(), progress)?;
    let report = nyc_shootings_analytics::build_report(&incidents, &OrdinaryLeastSquares);
    let written = export::write_report(&config.output_dir, &report, config.format)?;

    log::info!(
        "Summarized {} rows ({} incidents, {} murders) in {:.1}s",
        report.summary.rows,
        report.summary.incidents,
        report.summary.murders,
        start.elapsed().as_secs_f64(),
    );

    Ok(SummarizeOutcome { report, written })
}
