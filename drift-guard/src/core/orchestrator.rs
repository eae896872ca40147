//! The run orchestrator.
//!
//! Drives one input dataset through load → column resolution → per-column
//! analysis → artifact serialization → schema validation → sealing. Column
//! and validation failures are captured into the run's own warnings and
//! errors; only artifact write failures propagate, because a half-written
//! run cannot be sealed.

use chrono::{SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::artifacts::{
    self, ArtifactSet, CONFIG_USED_NAME, REPORT_NAME, RUN_MANIFEST_NAME,
};
use super::report::{
    InputDescriptor, RunManifest, RunReport, RunStatus, MANIFEST_SCHEMA_VERSION,
    REPORT_SCHEMA_VERSION,
};
use crate::analyzers::{analyze_series, AnalysisParams, Observation};
use crate::config::RunConfig;
use crate::error::Result;
use crate::integrity::{self, BUNDLE_NAME};
use crate::schema::{SchemaId, SchemaValidator};
use crate::sources::{CsvSource, DataSource, TableData};

/// Candidate names tried for the timestamp column when none is configured.
const TIME_COL_CANDIDATES: &[&str] = &["timestamp", "time", "date", "datetime", "t"];

/// Everything needed to execute one run.
#[derive(Debug)]
pub struct RunRequest<'a> {
    /// The input CSV file.
    pub input: &'a Path,
    /// The run's exclusive output directory. Must not already exist.
    pub run_dir: &'a Path,
    /// Unique run identifier.
    pub run_id: String,
    /// Raw (not yet validated) configuration.
    pub config: &'a RunConfig,
    /// Whether to package the artifact set into `bundle.zip`.
    pub bundle: bool,
}

/// The sealed result of one run.
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: String,
    pub status: RunStatus,
    pub run_dir: PathBuf,
    pub report: RunReport,
}

fn utc_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Executes one run to completion and seals its directory.
///
/// Always produces a structurally complete artifact set, even for
/// unreadable input; per-run status is the sole signal of degradation.
#[instrument(skip(request, validator), fields(run_id = %request.run_id, input = %request.input.display()))]
pub async fn execute_run(
    request: RunRequest<'_>,
    validator: &dyn SchemaValidator,
) -> Result<RunOutcome> {
    let utc_start = utc_now();
    std::fs::create_dir_all(request.run_dir)?;

    let (config, mut warnings) = request.config.validated();
    let mut errors: Vec<String> = Vec::new();
    let mut status = RunStatus::Ok;
    let mut artifact_set = ArtifactSet::new();

    // An unreadable input is not fatal here; the load phase classifies
    // the run.
    match artifacts::snapshot_input(request.run_dir, request.input) {
        Ok(rel) => artifact_set.add(rel),
        Err(e) => warnings.push(format!("input_snapshot_failed:{e}")),
    }

    artifacts::write_json(request.run_dir, CONFIG_USED_NAME, &config)?;
    artifact_set.add(CONFIG_USED_NAME);

    let loaded = CsvSource::new(request.input).load().await;

    let mut observations: BTreeMap<String, Observation> = BTreeMap::new();
    let mut column_data: Vec<(String, Vec<f64>)> = Vec::new();
    let mut time_column: Option<(String, Vec<String>)> = None;

    match loaded {
        Err(e) => {
            status = RunStatus::InvalidInput;
            errors.push(format!("read_csv_failed:{e}"));
            warn!(error = %e, "Input could not be loaded");
        }
        Ok(table) => {
            if table.num_rows() == 0 {
                warnings.push("csv_empty".to_string());
            }

            let resolved = resolve_columns(&table, &config, &mut warnings);
            if resolved.is_empty() {
                status = RunStatus::InvalidInput;
                errors.push("no_numeric_series_columns".to_string());
            } else {
                time_column = resolve_time_column(&table, &config, &mut warnings);

                for column in &resolved {
                    match table.coerce_numeric(column) {
                        Ok(series) => {
                            if series.newly_missing > 0 {
                                warnings.push(format!(
                                    "coerce_to_numeric:{column}:{}",
                                    series.newly_missing
                                ));
                            }
                            column_data.push((column.clone(), series.values));
                        }
                        Err(e) => {
                            // Failure on one column never aborts the run.
                            errors.push(format!("column_analysis_failed:{column}:{e}"));
                            status.worsen(RunStatus::Partial);
                        }
                    }
                }

                let params = AnalysisParams::from(&config);
                for (column, values) in &column_data {
                    observations.insert(column.clone(), analyze_series(values, &params));
                }
                debug!(columns = observations.len(), "Analyzed resolved columns");
            }
        }
    }

    let time_ref = time_column
        .as_ref()
        .map(|(name, values)| (name.as_str(), values.as_slice()));
    artifact_set.add(artifacts::write_series_clean(
        request.run_dir,
        time_ref,
        &column_data,
    )?);

    let observation_rows: Vec<(String, &Observation)> = column_data
        .iter()
        .filter_map(|(column, _)| {
            observations
                .get(column)
                .map(|obs| (column.clone(), obs))
        })
        .collect();
    artifact_set.add(artifacts::write_features(request.run_dir, &observation_rows)?);
    artifact_set.add(artifacts::write_rupture_marks(
        request.run_dir,
        &observation_rows,
    )?);

    let utc_end = utc_now();
    let input_sha256 = integrity::sha256_file(request.input).unwrap_or_default();

    let mut report = RunReport {
        schema_version: REPORT_SCHEMA_VERSION.to_string(),
        run_id: request.run_id.clone(),
        utc_start,
        utc_end,
        status,
        input: InputDescriptor {
            source: request.input.display().to_string(),
            sha256: input_sha256,
        },
        observations,
        warnings,
        errors,
    };

    // Schema validation downgrades but never aborts.
    let report_value = serde_json::to_value(&report)?;
    if let Err(violation) = validator.validate(&report_value, SchemaId::Report) {
        report
            .warnings
            .push(format!("report_schema_validation_failed:{}", violation.summary()));
        report.status.worsen(RunStatus::Partial);
        warn!(violation = %violation.summary(), "Report schema validation failed");
    }

    artifacts::write_json(request.run_dir, REPORT_NAME, &report)?;
    artifact_set.add(REPORT_NAME);

    let manifest = RunManifest {
        schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
        run_id: request.run_id.clone(),
        utc_created: utc_now(),
        config,
        paths: artifact_set
            .rel_paths()
            .iter()
            .map(|rel| (path_index_key(rel), rel.clone()))
            .collect(),
    };
    artifacts::write_json(request.run_dir, RUN_MANIFEST_NAME, &manifest)?;
    artifact_set.add(RUN_MANIFEST_NAME);

    // Bundle before hashing so the archive digest lands in the manifest as
    // its final entry; the digest manifest is always the last write.
    let mut digest_paths = artifact_set.rel_paths().to_vec();
    if request.bundle {
        integrity::write_bundle(request.run_dir, artifact_set.rel_paths())?;
        digest_paths.push(BUNDLE_NAME.to_string());
    }
    integrity::write_digest_manifest(request.run_dir, &digest_paths)?;

    info!(
        status = %report.status,
        warnings = report.warnings.len(),
        errors = report.errors.len(),
        run_dir = %request.run_dir.display(),
        "Run sealed"
    );

    Ok(RunOutcome {
        run_id: request.run_id,
        status: report.status,
        run_dir: request.run_dir.to_path_buf(),
        report,
    })
}

/// Determines the set of columns to analyze: the explicit configured list
/// filtered to present columns, or numeric-column auto-detection.
fn resolve_columns(
    table: &TableData,
    config: &RunConfig,
    warnings: &mut Vec<String>,
) -> Vec<String> {
    match config.explicit_columns() {
        Some(requested) => {
            let mut present = Vec::new();
            for column in requested {
                if table.has_column(&column) {
                    present.push(column);
                } else {
                    warnings.push(format!("column_not_found:{column}"));
                }
            }
            present
        }
        None => table.numeric_column_names(),
    }
}

/// Resolves the optional timestamp column: the configured name if present,
/// else the first conventional candidate found in the dataset.
fn resolve_time_column(
    table: &TableData,
    config: &RunConfig,
    warnings: &mut Vec<String>,
) -> Option<(String, Vec<String>)> {
    let name = match &config.time_col {
        Some(configured) => {
            if table.has_column(configured) {
                Some(configured.clone())
            } else {
                warnings.push(format!("time_col_not_found:{configured}"));
                None
            }
        }
        None => TIME_COL_CANDIDATES
            .iter()
            .find(|c| table.has_column(c))
            .map(|c| c.to_string()),
    }?;

    match table.display_column(&name) {
        Ok(values) => Some((name, values)),
        Err(e) => {
            warnings.push(format!("time_col_unreadable:{name}:{e}"));
            None
        }
    }
}

fn path_index_key(rel: &str) -> String {
    match rel {
        CONFIG_USED_NAME => "config_used".to_string(),
        super::artifacts::SERIES_CLEAN_NAME => "series_clean".to_string(),
        super::artifacts::FEATURES_NAME => "features".to_string(),
        super::artifacts::RUPTURE_MARKS_NAME => "rupture_marks".to_string(),
        REPORT_NAME => "report".to_string(),
        _ if rel.starts_with(artifacts::INPUTS_DIR) => "input".to_string(),
        other => other.to_string(),
    }
}
