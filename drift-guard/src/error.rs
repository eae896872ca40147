//! Error types for the drift-guard observation pipeline.
//!
//! This module provides a comprehensive error handling strategy using `thiserror`
//! for automatic error trait implementations. All errors in the drift-guard
//! library are represented by the `DriftError` enum.

use thiserror::Error;

/// The main error type for the drift-guard library.
///
/// This enum represents all possible errors that can occur while loading
/// datasets, analyzing columns, and writing run artifacts.
#[derive(Error, Debug)]
pub enum DriftError {
    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing a run artifact. Fatal to the run: a half-written run
    /// cannot be sealed.
    #[error("Artifact write failed for '{path}': {message}")]
    ArtifactWrite {
        /// Relative artifact path inside the run directory
        path: String,
        /// Detailed error message
        message: String,
    },

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error when a required column is not found in the dataset.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Error when data types don't match expected types.
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// A document failed validation against its schema contract.
    #[error("Schema violation for '{schema}': {message}")]
    SchemaViolation {
        /// Identifier of the schema document
        schema: String,
        /// Detailed violation message
        message: String,
    },

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from archive packaging operations.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error from CSV artifact writing.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, DriftError>`.
///
/// This is the standard `Result` type used throughout the drift-guard library.
pub type Result<T> = std::result::Result<T, DriftError>;

impl DriftError {
    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates a new artifact write error for the given relative path.
    pub fn artifact_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new schema violation error.
    pub fn schema_violation(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            schema: schema.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DriftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_data_source_error() {
        let err = DriftError::data_source("CSV", "Invalid file format");
        assert_eq!(err.to_string(), "Data source error: Invalid file format");
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = DriftError::data_source_with_source(
            "CSV",
            "Could not read input",
            Box::new(source),
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_column_not_found() {
        let err = DriftError::ColumnNotFound {
            column: "value".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'value' not found in dataset");
    }

    #[test]
    fn test_artifact_write_error() {
        let err = DriftError::artifact_write("report.json", "disk full");
        assert_eq!(
            err.to_string(),
            "Artifact write failed for 'report.json': disk full"
        );
    }

    #[test]
    fn test_schema_violation() {
        let err = DriftError::schema_violation("driftguard.report.v1", "missing run_id");
        assert!(err.to_string().contains("driftguard.report.v1"));
        assert!(err.to_string().contains("missing run_id"));
    }
}
