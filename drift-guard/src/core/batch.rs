//! The batch controller.
//!
//! Expands one input path/glob/directory into a list of CSV inputs and
//! drives the orchestrator once per input. Runs own disjoint output
//! subdirectories, so they may execute concurrently; results are collected
//! in input order and the batch manifest is sealed after every run
//! completes.

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use super::ids::IdGenerator;
use super::orchestrator::{execute_run, RunOutcome, RunRequest};
use super::report::{BatchManifest, RunSummary, BATCH_SCHEMA_VERSION};
use crate::config::RunConfig;
use crate::error::{DriftError, Result};
use crate::schema::SchemaValidator;

/// Canonical file name of the batch manifest.
pub const BATCH_MANIFEST_NAME: &str = "batch_manifest.json";

/// Subdirectory of the output root holding the per-run directories.
const RUNS_DIR: &str = "runs";

/// Options for batch execution.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum concurrent runs; clamped to `[1, num_cpus]`.
    pub jobs: usize,
    /// Whether each run packages a `bundle.zip`.
    pub bundle: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            bundle: false,
        }
    }
}

/// Expands an input argument into a sorted list of CSV files.
///
/// A directory expands to its `*.csv` children, a file to itself, anything
/// else is treated as a glob pattern. An empty result is a usage error for
/// the caller, not a batch failure.
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "csv"))
            .collect();
        files.sort();
        return Ok(files);
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let matches = glob::glob(pattern)
        .map_err(|e| DriftError::Configuration(format!("invalid glob pattern '{pattern}': {e}")))?;
    let mut files: Vec<PathBuf> = matches
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

struct RunPlan {
    input: PathBuf,
    run_id: String,
    run_dir: PathBuf,
    run_dir_rel: String,
}

fn plan_runs(
    inputs: &[PathBuf],
    output_dir: &Path,
    config: &RunConfig,
    ids: &mut IdGenerator,
) -> Vec<RunPlan> {
    inputs
        .iter()
        .map(|input| {
            let stem = config
                .series_name
                .clone()
                .or_else(|| {
                    input
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .map(|s| s.to_string())
                })
                .unwrap_or_else(|| "series".to_string());
            let run_id = ids.id();
            let run_dir_rel = format!("{RUNS_DIR}/{stem}__{}", ids.dir_suffix());
            RunPlan {
                input: input.clone(),
                run_id,
                run_dir: output_dir.join(&run_dir_rel),
                run_dir_rel,
            }
        })
        .collect()
}

/// Executes one run per input and seals the batch manifest.
///
/// Run failures that the orchestrator captures in-band (bad input, bad
/// columns) never abort the batch; only artifact write failures propagate.
#[instrument(skip_all, fields(inputs = inputs.len(), output = %output_dir.display()))]
pub async fn run_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    config: &RunConfig,
    validator: &dyn SchemaValidator,
    ids: &mut IdGenerator,
    options: &BatchOptions,
) -> Result<BatchManifest> {
    std::fs::create_dir_all(output_dir.join(RUNS_DIR))?;

    let batch_id = ids.id();
    let utc_start = now();
    let plans = plan_runs(inputs, output_dir, config, ids);
    let jobs = options.jobs.clamp(1, num_cpus::get());

    info!(batch_id = %batch_id, runs = plans.len(), jobs, "Starting batch");

    let outcomes: Vec<(String, String, Result<RunOutcome>)> = stream::iter(plans)
        .map(|plan| async move {
            let request = RunRequest {
                input: &plan.input,
                run_dir: &plan.run_dir,
                run_id: plan.run_id.clone(),
                config,
                bundle: options.bundle,
            };
            let outcome = execute_run(request, validator).await;
            (
                plan.input.display().to_string(),
                plan.run_dir_rel.clone(),
                outcome,
            )
        })
        .buffered(jobs)
        .collect()
        .await;

    let mut runs = Vec::with_capacity(outcomes.len());
    for (input, run_dir_rel, outcome) in outcomes {
        let outcome = outcome?;
        runs.push(RunSummary {
            input,
            status: outcome.status,
            run_dir: run_dir_rel,
        });
    }

    let manifest = BatchManifest {
        schema_version: BATCH_SCHEMA_VERSION.to_string(),
        batch_id,
        utc_start,
        utc_end: now(),
        inputs: inputs.iter().map(|p| p.display().to_string()).collect(),
        runs,
    };

    super::artifacts::write_json(output_dir, BATCH_MANIFEST_NAME, &manifest)?;
    info!(batch_id = %manifest.batch_id, "Batch manifest sealed");
    Ok(manifest)
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.csv");
        std::fs::write(&path, "a\n1\n").unwrap();
        let inputs = expand_inputs(path.to_str().unwrap()).unwrap();
        assert_eq!(inputs, vec![path]);
    }

    #[test]
    fn test_expand_directory_sorted_csv_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "x\n").unwrap();
        std::fs::write(dir.path().join("a.csv"), "x\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x\n").unwrap();
        let inputs = expand_inputs(dir.path().to_str().unwrap()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_expand_glob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("s1.csv"), "x\n").unwrap();
        std::fs::write(dir.path().join("s2.csv"), "x\n").unwrap();
        let pattern = format!("{}/s*.csv", dir.path().display());
        let inputs = expand_inputs(&pattern).unwrap();
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn test_expand_no_matches_is_empty() {
        let inputs = expand_inputs("/nonexistent/nowhere/*.csv").unwrap();
        assert!(inputs.is_empty());
    }

    #[test]
    fn test_plan_uses_series_name_and_distinct_suffixes() {
        let mut ids = IdGenerator::from_seed(3);
        let config = RunConfig {
            series_name: Some("sensor".to_string()),
            ..RunConfig::default()
        };
        let inputs = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
        let plans = plan_runs(&inputs, Path::new("/out"), &config, &mut ids);
        assert!(plans[0].run_dir_rel.starts_with("runs/sensor__"));
        assert!(plans[1].run_dir_rel.starts_with("runs/sensor__"));
        assert_ne!(plans[0].run_dir_rel, plans[1].run_dir_rel);
        assert_ne!(plans[0].run_id, plans[1].run_id);
    }
}
