//! Schema contracts for the document artifacts.
//!
//! The pipeline depends only on the narrow [`SchemaValidator`] capability:
//! `validate(document, schema) -> Result<(), SchemaViolation>`. The default
//! implementation compiles the embedded JSON Schema documents once and
//! caches them for the life of the process; any other engine can be
//! injected behind the same trait.

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;

/// Embedded schema documents, keyed by their canonical file name.
pub const EMBEDDED_SCHEMAS: &[(&str, &str)] = &[
    (
        "config.schema.json",
        include_str!("../../schemas/config.schema.json"),
    ),
    (
        "report.schema.json",
        include_str!("../../schemas/report.schema.json"),
    ),
    (
        "batch.schema.json",
        include_str!("../../schemas/batch.schema.json"),
    ),
];

/// Identifies one of the embedded schema contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaId {
    Config,
    Report,
    Batch,
}

impl SchemaId {
    /// The canonical file name of the schema document.
    pub fn file_name(&self) -> &'static str {
        match self {
            SchemaId::Config => "config.schema.json",
            SchemaId::Report => "report.schema.json",
            SchemaId::Batch => "batch.schema.json",
        }
    }

    /// The schema's `$id`.
    pub fn id(&self) -> &'static str {
        match self {
            SchemaId::Config => "driftguard.config.v1",
            SchemaId::Report => "driftguard.report.v1",
            SchemaId::Batch => "driftguard.batch.v1",
        }
    }

    fn raw(&self) -> &'static str {
        EMBEDDED_SCHEMAS
            .iter()
            .find(|(name, _)| *name == self.file_name())
            .map(|(_, raw)| *raw)
            .expect("embedded schema present for every SchemaId")
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A document failed its schema contract.
#[derive(Debug, Clone)]
pub struct SchemaViolation {
    /// The schema the document was checked against.
    pub schema: String,
    /// One message per violation, in document order.
    pub messages: Vec<String>,
}

impl SchemaViolation {
    /// Joins the violation messages into one line.
    pub fn summary(&self) -> String {
        self.messages.join("; ")
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.schema, self.summary())
    }
}

impl std::error::Error for SchemaViolation {}

/// The injected validation capability.
pub trait SchemaValidator: Send + Sync {
    /// Validates a document against a schema contract.
    fn validate(&self, document: &Value, schema: SchemaId)
        -> std::result::Result<(), SchemaViolation>;
}

static COMPILED: Lazy<Vec<(SchemaId, JSONSchema)>> = Lazy::new(|| {
    [SchemaId::Config, SchemaId::Report, SchemaId::Batch]
        .into_iter()
        .map(|id| {
            let value: Value = serde_json::from_str(id.raw())
                .expect("embedded schema document is valid JSON");
            let compiled =
                JSONSchema::compile(&value).expect("embedded schema document compiles");
            (id, compiled)
        })
        .collect()
});

/// Default validator backed by the embedded JSON Schema documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaValidator;

impl SchemaValidator for JsonSchemaValidator {
    fn validate(
        &self,
        document: &Value,
        schema: SchemaId,
    ) -> std::result::Result<(), SchemaViolation> {
        let compiled = COMPILED
            .iter()
            .find(|(id, _)| *id == schema)
            .map(|(_, c)| c)
            .expect("every SchemaId is compiled");

        let result = compiled.validate(document);
        match result {
            Ok(()) => Ok(()),
            Err(errors) => Err(SchemaViolation {
                schema: schema.id().to_string(),
                messages: errors
                    .map(|e| format!("{} at {}", e, e.instance_path))
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_schemas_compile() {
        for (id, _) in COMPILED.iter() {
            assert!(!id.file_name().is_empty());
        }
    }

    #[test]
    fn test_config_schema_accepts_empty_document() {
        let validator = JsonSchemaValidator;
        assert!(validator.validate(&json!({}), SchemaId::Config).is_ok());
    }

    #[test]
    fn test_config_schema_rejects_bad_window_type() {
        let validator = JsonSchemaValidator;
        let doc = json!({"outliers": {"window": "twenty"}});
        let violation = validator.validate(&doc, SchemaId::Config).unwrap_err();
        assert_eq!(violation.schema, "driftguard.config.v1");
        assert!(!violation.messages.is_empty());
    }

    #[test]
    fn test_report_schema_requires_run_id() {
        let validator = JsonSchemaValidator;
        let doc = json!({
            "schema_version": "driftguard.report.v1",
            "utc_start": "2026-01-01T00:00:00Z",
            "utc_end": "2026-01-01T00:00:01Z",
            "status": "ok",
            "input": {"source": "a.csv", "sha256": ""},
            "observations": {},
            "warnings": [],
            "errors": []
        });
        assert!(validator.validate(&doc, SchemaId::Report).is_err());
    }

    #[test]
    fn test_report_schema_accepts_null_statistics() {
        let validator = JsonSchemaValidator;
        let doc = json!({
            "schema_version": "driftguard.report.v1",
            "run_id": "abc123",
            "utc_start": "2026-01-01T00:00:00Z",
            "utc_end": "2026-01-01T00:00:01Z",
            "status": "invalid_input",
            "input": {"source": "a.csv", "sha256": ""},
            "observations": {
                "value": {
                    "stats": {
                        "count": 0, "finite_count": 0, "missing_count": 0,
                        "mean": null, "std": null, "min": null, "max": null,
                        "median": null, "p05": null, "p95": null,
                        "trend_slope": null
                    },
                    "outliers": {"outlier_count": 0, "observed_count": 0, "density": 0.0},
                    "ruptures": {"method": "rolling_mean_delta", "marks": []},
                    "seasonality": {"peaks": []}
                }
            },
            "warnings": [],
            "errors": []
        });
        let result = validator.validate(&doc, SchemaId::Report);
        assert!(result.is_ok(), "{:?}", result.err().map(|v| v.summary()));
    }
}
