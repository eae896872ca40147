//! CSV data source built on DataFusion's CSV reader.

use async_trait::async_trait;
use datafusion::prelude::{CsvReadOptions, SessionContext};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::{DataSource, TableData};
use crate::error::{DriftError, Result};

/// Options for reading CSV files.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the first row is a header. Defaults to true.
    pub has_header: bool,
    /// Field delimiter. Defaults to `,`.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
        }
    }
}

/// A CSV file source with schema inference.
///
/// # Examples
///
/// ```rust,no_run
/// use drift_guard::sources::{CsvSource, DataSource};
///
/// # async fn example() -> drift_guard::error::Result<()> {
/// let source = CsvSource::new("data/series.csv");
/// let table = source.load().await?;
/// println!("{} rows", table.num_rows());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a CSV source for the given path with default options.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options: CsvOptions::default(),
        }
    }

    /// Creates a CSV source with explicit options.
    pub fn with_options(path: impl AsRef<Path>, options: CsvOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
        }
    }

    /// Returns the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// DataFusion requires the registered extension to match the file name.
    fn file_extension(&self) -> String {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!(".{ext}"),
            None => String::new(),
        }
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<TableData> {
        if !self.path.is_file() {
            return Err(DriftError::data_source(
                "CSV",
                format!("input not found: {}", self.path.display()),
            ));
        }

        let path_str = self.path.to_str().ok_or_else(|| {
            DriftError::data_source("CSV", format!("non-UTF8 path: {}", self.path.display()))
        })?;

        let ext = self.file_extension();
        let read_options = CsvReadOptions::new()
            .has_header(self.options.has_header)
            .delimiter(self.options.delimiter)
            .file_extension(&ext);

        let ctx = SessionContext::new();
        ctx.register_csv("data", path_str, read_options)
            .await
            .map_err(|e| {
                DriftError::data_source_with_source(
                    "CSV",
                    format!("failed to read {}", self.path.display()),
                    Box::new(e),
                )
            })?;

        let df = ctx.table("data").await?;
        let table = TableData::from_dataframe(df).await?;
        debug!(
            rows = table.num_rows(),
            columns = table.column_names().len(),
            "Loaded CSV source"
        );
        Ok(table)
    }

    fn description(&self) -> String {
        format!("CSV file: {}", self.path.display())
    }
}
