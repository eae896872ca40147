//! Immutable tabular dataset collected from a DataFusion query.

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use datafusion::prelude::DataFrame;
use std::sync::Arc;

use crate::error::{DriftError, Result};

/// One numeric column after coercion to `Float64`.
///
/// Missing values become NaN. `newly_missing` counts values that were
/// present before coercion but failed to parse as numbers.
#[derive(Debug, Clone)]
pub struct CoercedSeries {
    pub values: Vec<f64>,
    pub newly_missing: usize,
}

/// An immutable, fully collected tabular dataset.
///
/// Owned by exactly one run; never mutated after collection.
#[derive(Debug, Clone)]
pub struct TableData {
    schema: SchemaRef,
    batch: RecordBatch,
}

impl TableData {
    /// Collects a DataFrame into a single record batch.
    pub async fn from_dataframe(df: DataFrame) -> Result<Self> {
        let schema: SchemaRef = Arc::new(Schema::from(df.schema()));
        let batches = df.collect().await?;
        let batch = if batches.is_empty() {
            RecordBatch::new_empty(schema.clone())
        } else {
            concat_batches(&schema, &batches)?
        };
        Ok(Self { schema, batch })
    }

    /// Builds a table directly from a record batch (used by tests).
    pub fn from_batch(batch: RecordBatch) -> Self {
        Self {
            schema: batch.schema(),
            batch,
        }
    }

    /// Number of rows in the dataset.
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// All column names, in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Whether a column of the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.schema.column_with_name(name).is_some()
    }

    /// Names of columns with an Arrow numeric type, in schema order.
    ///
    /// This is the auto-detection set used when no explicit column
    /// selection is configured.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .filter(|f| f.data_type().is_numeric())
            .map(|f| f.name().clone())
            .collect()
    }

    fn column(&self, name: &str) -> Result<&ArrayRef> {
        let (index, _) = self
            .schema
            .column_with_name(name)
            .ok_or_else(|| DriftError::ColumnNotFound {
                column: name.to_string(),
            })?;
        Ok(self.batch.column(index))
    }

    /// Coerces a column to `Float64`, counting values newly lost to the
    /// coercion. The cast is safe: unparseable values become null, and
    /// nulls become NaN in the output.
    pub fn coerce_numeric(&self, name: &str) -> Result<CoercedSeries> {
        let array = self.column(name)?;
        let nulls_before = array.null_count();

        let casted = cast(array, &DataType::Float64)?;
        let floats = casted
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| DriftError::TypeMismatch {
                column: name.to_string(),
                expected: "Float64".to_string(),
                found: casted.data_type().to_string(),
            })?;

        let values: Vec<f64> = (0..floats.len())
            .map(|i| {
                if floats.is_null(i) {
                    f64::NAN
                } else {
                    floats.value(i)
                }
            })
            .collect();
        let newly_missing = floats.null_count().saturating_sub(nulls_before);

        Ok(CoercedSeries {
            values,
            newly_missing,
        })
    }

    /// Renders a column as display strings (nulls become empty strings).
    /// Used for the timestamp column of the cleaned series artifact.
    pub fn display_column(&self, name: &str) -> Result<Vec<String>> {
        let array = self.column(name)?;
        let casted = cast(array, &DataType::Utf8)?;
        let strings = casted
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| DriftError::TypeMismatch {
                column: name.to_string(),
                expected: "Utf8".to_string(),
                found: casted.data_type().to_string(),
            })?;

        Ok((0..strings.len())
            .map(|i| {
                if strings.is_null(i) {
                    String::new()
                } else {
                    strings.value(i).to_string()
                }
            })
            .collect())
    }
}
