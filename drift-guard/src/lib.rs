//! # drift-guard — Auditable Drift Observation for Tabular Time Series
//!
//! drift-guard ingests tabular time-series data and produces an auditable,
//! reproducible bundle of descriptive and change-detection statistics per
//! numeric column: summary statistics, rolling outlier density, rupture
//! (change-point) markers, and spectral periodicity peaks. Every run yields
//! a content-addressed, schema-validated artifact set with a verifiable
//! hash chain, suitable for archival or CI gating.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drift_guard::prelude::*;
//! use std::path::Path;
//!
//! # async fn example() -> drift_guard::error::Result<()> {
//! let inputs = expand_inputs("data/*.csv")?;
//! let config = RunConfig::default();
//! let validator = JsonSchemaValidator;
//! let mut ids = IdGenerator::from_entropy();
//!
//! let manifest = run_batch(
//!     &inputs,
//!     Path::new("out"),
//!     &config,
//!     &validator,
//!     &mut ids,
//!     &BatchOptions::default(),
//! )
//! .await?;
//!
//! for run in &manifest.runs {
//!     println!("{} -> {} ({})", run.input, run.run_dir, run.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`analyzers`**: the pure analysis engine — one numeric series in, one
//!   structured [`analyzers::Observation`] out
//! - **`sources`**: DataFusion-backed tabular loading and numeric coercion
//! - **`core`**: the run orchestrator, batch controller, artifact writers,
//!   and document types
//! - **`integrity`**: content digests, the digest manifest, and the bundle
//!   archive
//! - **`schema`**: the injected schema-validation capability and the
//!   embedded schema documents
//!
//! ## Run guarantees
//!
//! A run directory is exclusively owned by its run from creation to
//! sealing: the digest manifest is written last, after every other
//! artifact, and lists a content digest for each one. Re-running never
//! mutates a prior run's directory. Per-run status (`ok`, `partial`,
//! `invalid_input`) is the sole signal of degradation — one bad input
//! never aborts a batch.

pub mod analyzers;
pub mod config;
pub mod core;
pub mod error;
pub mod integrity;
pub mod logging;
pub mod prelude;
pub mod schema;
pub mod sources;
