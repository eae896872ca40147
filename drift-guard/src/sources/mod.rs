//! Data source connectors for the observation pipeline.
//!
//! Sources load one tabular dataset into an immutable [`TableData`] through
//! DataFusion. The dataset is read exactly once per run; everything
//! downstream operates on the collected record batch.

use async_trait::async_trait;
use std::fmt::Debug;

mod csv;
mod table;

pub use csv::{CsvOptions, CsvSource};
pub use table::{CoercedSeries, TableData};

use crate::error::Result;

/// A tabular data source that can be loaded into a [`TableData`].
///
/// Implementations handle schema inference and efficient loading; the
/// orchestrator depends only on this trait.
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Loads the source into an immutable table.
    async fn load(&self) -> Result<TableData>;

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;
}
