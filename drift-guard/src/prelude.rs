//! Prelude for commonly used types in drift-guard.

pub use crate::analyzers::{analyze_series, AnalysisParams, Observation};
pub use crate::config::RunConfig;
pub use crate::core::{
    expand_inputs, run_batch, BatchOptions, IdGenerator, RunOutcome, RunStatus,
};
pub use crate::error::{DriftError, Result};
pub use crate::logging::LoggingConfig;
pub use crate::schema::{JsonSchemaValidator, SchemaId, SchemaValidator};
pub use crate::sources::{CsvSource, DataSource};
