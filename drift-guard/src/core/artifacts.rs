//! Artifact writers for the run directory.
//!
//! Every artifact a run produces goes through this module, and every write
//! registers the artifact's relative path in an [`ArtifactSet`]. The digest
//! manifest is later computed over exactly that enumeration — never over a
//! directory scan that could race with other writers.

use serde::Serialize;
use std::path::Path;

use crate::analyzers::Observation;
use crate::error::{DriftError, Result};

/// Relative path of the input snapshot directory.
pub const INPUTS_DIR: &str = "inputs";
/// Relative path of the echoed configuration.
pub const CONFIG_USED_NAME: &str = "config_used.json";
/// Relative path of the cleaned series table.
pub const SERIES_CLEAN_NAME: &str = "series_clean.csv";
/// Relative path of the per-column feature table.
pub const FEATURES_NAME: &str = "features.csv";
/// Relative path of the rupture marker table.
pub const RUPTURE_MARKS_NAME: &str = "rupture_marks.csv";
/// Relative path of the run report.
pub const REPORT_NAME: &str = "report.json";
/// Relative path of the run manifest.
pub const RUN_MANIFEST_NAME: &str = "run_manifest.json";

const FEATURES_HEADER: &[&str] = &[
    "column",
    "count",
    "finite_count",
    "missing_count",
    "mean",
    "std",
    "min",
    "max",
    "median",
    "p05",
    "p95",
    "trend_slope",
    "outlier_count",
    "observed_count",
    "outlier_density",
    "rupture_count",
];

const RUPTURE_HEADER: &[&str] = &["column", "index", "score"];

/// The fixed, ordered enumeration of a run's artifacts.
#[derive(Debug, Default, Clone)]
pub struct ArtifactSet {
    rel_paths: Vec<String>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an artifact by its relative path (forward slashes).
    pub fn add(&mut self, rel_path: impl Into<String>) {
        self.rel_paths.push(rel_path.into());
    }

    /// The enumerated relative paths, in registration order.
    pub fn rel_paths(&self) -> &[String] {
        &self.rel_paths
    }
}

/// Copies the raw input file into `inputs/` and returns its relative path.
pub fn snapshot_input(run_dir: &Path, input: &Path) -> Result<String> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            DriftError::artifact_write(INPUTS_DIR, format!("unusable input name: {}", input.display()))
        })?;
    let rel = format!("{INPUTS_DIR}/{file_name}");
    std::fs::create_dir_all(run_dir.join(INPUTS_DIR))
        .map_err(|e| DriftError::artifact_write(INPUTS_DIR, e.to_string()))?;
    std::fs::copy(input, run_dir.join(&rel))
        .map_err(|e| DriftError::artifact_write(&rel, e.to_string()))?;
    Ok(rel)
}

/// Writes a JSON document artifact with a trailing newline.
pub fn write_json<T: Serialize>(run_dir: &Path, rel_path: &str, document: &T) -> Result<()> {
    let mut contents = serde_json::to_string_pretty(document)?;
    contents.push('\n');
    std::fs::write(run_dir.join(rel_path), contents)
        .map_err(|e| DriftError::artifact_write(rel_path, e.to_string()))
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v}")
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v}")).unwrap_or_default()
}

/// Writes the cleaned series table: the resolved time column (if any)
/// followed by each selected column after numeric coercion. Missing values
/// are empty cells.
pub fn write_series_clean(
    run_dir: &Path,
    time_column: Option<(&str, &[String])>,
    columns: &[(String, Vec<f64>)],
) -> Result<String> {
    let path = run_dir.join(SERIES_CLEAN_NAME);

    let mut header: Vec<&str> = Vec::new();
    if let Some((name, _)) = time_column {
        header.push(name);
    }
    for (name, _) in columns {
        header.push(name);
    }
    if header.is_empty() {
        // Placeholder for runs with nothing to clean (unreadable input or
        // zero resolved columns): the artifact still exists.
        std::fs::write(&path, "")
            .map_err(|e| DriftError::artifact_write(SERIES_CLEAN_NAME, e.to_string()))?;
        return Ok(SERIES_CLEAN_NAME.to_string());
    }

    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| DriftError::artifact_write(SERIES_CLEAN_NAME, e.to_string()))?;
    writer.write_record(&header)?;

    let rows = columns
        .first()
        .map(|(_, values)| values.len())
        .or_else(|| time_column.map(|(_, t)| t.len()))
        .unwrap_or(0);
    for row in 0..rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if let Some((_, times)) = time_column {
            record.push(times.get(row).cloned().unwrap_or_default());
        }
        for (_, values) in columns {
            record.push(fmt_value(values[row]));
        }
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .map_err(|e| DriftError::artifact_write(SERIES_CLEAN_NAME, e.to_string()))?;
    Ok(SERIES_CLEAN_NAME.to_string())
}

/// Writes the flattened per-column feature table, one row per column.
pub fn write_features(
    run_dir: &Path,
    observations: &[(String, &Observation)],
) -> Result<String> {
    let path = run_dir.join(FEATURES_NAME);
    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| DriftError::artifact_write(FEATURES_NAME, e.to_string()))?;
    writer.write_record(FEATURES_HEADER)?;

    for (column, obs) in observations {
        let s = &obs.stats;
        writer.write_record(&[
            column.clone(),
            s.count.to_string(),
            s.finite_count.to_string(),
            s.missing_count.to_string(),
            fmt_opt(s.mean),
            fmt_opt(s.std),
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.median),
            fmt_opt(s.p05),
            fmt_opt(s.p95),
            fmt_opt(s.trend_slope),
            obs.outliers.outlier_count.to_string(),
            obs.outliers.observed_count.to_string(),
            fmt_value(obs.outliers.density),
            obs.ruptures.marks.len().to_string(),
        ])?;
    }
    writer
        .flush()
        .map_err(|e| DriftError::artifact_write(FEATURES_NAME, e.to_string()))?;
    Ok(FEATURES_NAME.to_string())
}

/// Writes the rupture marker table, one row per (column, mark) pair.
pub fn write_rupture_marks(
    run_dir: &Path,
    observations: &[(String, &Observation)],
) -> Result<String> {
    let path = run_dir.join(RUPTURE_MARKS_NAME);
    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| DriftError::artifact_write(RUPTURE_MARKS_NAME, e.to_string()))?;
    writer.write_record(RUPTURE_HEADER)?;

    for (column, obs) in observations {
        for mark in &obs.ruptures.marks {
            writer.write_record(&[
                column.clone(),
                mark.index.to_string(),
                fmt_value(mark.score),
            ])?;
        }
    }
    writer
        .flush()
        .map_err(|e| DriftError::artifact_write(RUPTURE_MARKS_NAME, e.to_string()))?;
    Ok(RUPTURE_MARKS_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{analyze_series, AnalysisParams};
    use crate::config::RunConfig;

    #[test]
    fn test_series_clean_with_time_column() {
        let dir = tempfile::tempdir().unwrap();
        let times = vec!["t0".to_string(), "t1".to_string(), "t2".to_string()];
        let columns = vec![("value".to_string(), vec![1.0, f64::NAN, 3.0])];
        write_series_clean(dir.path(), Some(("ts", &times)), &columns).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(SERIES_CLEAN_NAME)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "ts,value");
        assert_eq!(lines[1], "t0,1");
        assert_eq!(lines[2], "t1,");
        assert_eq!(lines[3], "t2,3");
    }

    #[test]
    fn test_features_row_per_column() {
        let dir = tempfile::tempdir().unwrap();
        let params = AnalysisParams::from(&RunConfig::default());
        let obs_a = analyze_series(&[1.0, 2.0, 3.0], &params);
        let obs_b = analyze_series(&[f64::NAN, f64::NAN], &params);
        let rows = vec![("a".to_string(), &obs_a), ("b".to_string(), &obs_b)];
        write_features(dir.path(), &rows).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(FEATURES_NAME)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("column,count,"));
        assert!(lines[1].starts_with("a,3,3,0,2,"));
        // Undefined statistics are empty cells, not numbers.
        assert!(lines[2].starts_with("b,2,0,2,,,,"));
    }

    #[test]
    fn test_rupture_table_row_per_mark() {
        let dir = tempfile::tempdir().unwrap();
        let params = AnalysisParams::from(&RunConfig {
            rupture: crate::config::RuptureParams {
                window: 2,
                topk: 2,
                method: "rolling_mean_delta".into(),
            },
            ..RunConfig::default()
        });
        let mut values = vec![1.0; 9];
        values.push(100.0);
        let obs = analyze_series(&values, &params);
        let rows = vec![("value".to_string(), &obs)];
        write_rupture_marks(dir.path(), &rows).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(RUPTURE_MARKS_NAME)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "column,index,score");
        assert!(lines[1].starts_with("value,9,49.5"));
    }

    #[test]
    fn test_snapshot_input() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("input.csv");
        std::fs::write(&src, "a\n1\n").unwrap();
        let run_dir = dir.path().join("run");
        std::fs::create_dir(&run_dir).unwrap();

        let rel = snapshot_input(&run_dir, &src).unwrap();
        assert_eq!(rel, "inputs/input.csv");
        assert_eq!(
            std::fs::read_to_string(run_dir.join(rel)).unwrap(),
            "a\n1\n"
        );
    }
}
