//! Document artifacts: run report, run manifest, and batch manifest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analyzers::Observation;
use crate::config::RunConfig;

/// Schema version of the run report document.
pub const REPORT_SCHEMA_VERSION: &str = "driftguard.report.v1";
/// Schema version of the run manifest document.
pub const MANIFEST_SCHEMA_VERSION: &str = "driftguard.manifest.v1";
/// Schema version of the batch manifest document.
pub const BATCH_SCHEMA_VERSION: &str = "driftguard.batch.v1";

/// Terminal status of a run.
///
/// Ordered by severity: sealing takes the worst status encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Ok,
    Partial,
    InvalidInput,
}

impl RunStatus {
    /// Degrades `self` to `other` if `other` is worse.
    pub fn worsen(&mut self, other: RunStatus) {
        if other > *self {
            *self = other;
        }
    }

    /// The wire spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ok => "ok",
            RunStatus::Partial => "partial",
            RunStatus::InvalidInput => "invalid_input",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the run's data came from, with a content digest of the raw input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// Source path as given on the command line.
    pub source: String,
    /// SHA-256 of the raw input file; empty when unreadable.
    pub sha256: String,
}

/// The run report document (`report.json`).
///
/// Observations are keyed by column name in a `BTreeMap` so serialization
/// order — and therefore report bytes — is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: String,
    pub run_id: String,
    pub utc_start: String,
    pub utc_end: String,
    pub status: RunStatus,
    pub input: InputDescriptor,
    pub observations: BTreeMap<String, Observation>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// The run manifest document (`run_manifest.json`): the resolved
/// configuration echoed verbatim plus a path index of every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: String,
    pub run_id: String,
    pub utc_created: String,
    pub config: RunConfig,
    pub paths: BTreeMap<String, String>,
}

/// One run summary inside a batch manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub input: String,
    pub status: RunStatus,
    pub run_dir: String,
}

/// The batch manifest document (`batch_manifest.json`), sealed after every
/// run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    pub schema_version: String,
    pub batch_id: String,
    pub utc_start: String,
    pub utc_end: String,
    pub inputs: Vec<String>,
    pub runs: Vec<RunSummary>,
}
