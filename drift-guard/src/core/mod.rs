//! Core orchestration: per-run execution, batch control, artifacts, and
//! document types.

pub mod artifacts;
pub mod batch;
pub mod ids;
pub mod orchestrator;
pub mod report;

pub use artifacts::ArtifactSet;
pub use batch::{expand_inputs, run_batch, BatchOptions, BATCH_MANIFEST_NAME};
pub use ids::IdGenerator;
pub use orchestrator::{execute_run, RunOutcome, RunRequest};
pub use report::{
    BatchManifest, InputDescriptor, RunManifest, RunReport, RunStatus, RunSummary,
    BATCH_SCHEMA_VERSION, MANIFEST_SCHEMA_VERSION, REPORT_SCHEMA_VERSION,
};
