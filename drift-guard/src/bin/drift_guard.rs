//! drift-guard CLI.
//!
//! `run` analyzes one or more CSV inputs into a batch of sealed run
//! directories; `schemas` lists the embedded schema documents. Exit code 0
//! means the batch completed — per-run status is reported in-band, in the
//! batch manifest. Non-zero exit codes are reserved for usage errors.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

use drift_guard::config::RunConfig;
use drift_guard::core::{expand_inputs, run_batch, BatchOptions, IdGenerator};
use drift_guard::logging::{init_logging, LoggingConfig};
use drift_guard::schema::{JsonSchemaValidator, SchemaId, SchemaValidator, EMBEDDED_SCHEMAS};

const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "drift-guard", author, version, about = "Auditable drift observation for tabular time series", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one or more CSV inputs into a batch of sealed runs
    Run {
        /// Input CSV file, directory, or glob (e.g. data/*.csv)
        #[arg(long)]
        input: String,
        /// Output directory for the batch
        #[arg(long)]
        output: PathBuf,
        /// Path to a JSON configuration document
        #[arg(long)]
        config: Option<PathBuf>,
        /// Package each run's artifacts into bundle.zip
        #[arg(long)]
        bundle: bool,
        /// Maximum concurrent runs
        #[arg(long, default_value_t = 1)]
        jobs: usize,
    },
    /// List the embedded schema documents
    Schemas {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default().with_level(Level::INFO)
    };
    let _ = init_logging(logging);

    match cli.command {
        Command::Run {
            input,
            output,
            config,
            bundle,
            jobs,
        } => cmd_run(&input, &output, config.as_deref(), bundle, jobs).await,
        Command::Schemas { json } => cmd_schemas(json),
    }
}

async fn cmd_run(
    input: &str,
    output: &std::path::Path,
    config_path: Option<&std::path::Path>,
    bundle: bool,
    jobs: usize,
) -> ExitCode {
    let inputs = match expand_inputs(input) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("drift-guard: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    if inputs.is_empty() {
        eprintln!("drift-guard: no CSV inputs match '{input}'");
        return ExitCode::from(EXIT_USAGE);
    }

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("drift-guard: {message}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let validator = JsonSchemaValidator;
    let mut ids = IdGenerator::from_entropy();
    let options = BatchOptions { jobs, bundle };

    match run_batch(&inputs, output, &config, &validator, &mut ids, &options).await {
        Ok(manifest) => {
            for run in &manifest.runs {
                println!("{}  {}  {}", run.status, run.input, run.run_dir);
            }
            println!(
                "batch {} sealed: {} run(s), manifest at {}",
                manifest.batch_id,
                manifest.runs.len(),
                output.join(drift_guard::core::BATCH_MANIFEST_NAME).display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("drift-guard: batch failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads and validates the configuration document. Any problem here is a
/// usage error: the batch never starts with a configuration we cannot
/// trust.
fn load_config(path: Option<&std::path::Path>) -> Result<RunConfig, String> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    if !path.is_file() {
        return Err(format!("config not found: {}", path.display()));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| format!("config {} is not valid JSON: {e}", path.display()))?;

    JsonSchemaValidator
        .validate(&document, SchemaId::Config)
        .map_err(|violation| {
            format!(
                "config {} violates {}: {}",
                path.display(),
                violation.schema,
                violation.summary()
            )
        })?;

    serde_json::from_value(document)
        .map_err(|e| format!("config {} could not be interpreted: {e}", path.display()))
}

fn cmd_schemas(json: bool) -> ExitCode {
    if json {
        let names: Vec<&str> = EMBEDDED_SCHEMAS.iter().map(|(name, _)| *name).collect();
        match serde_json::to_string_pretty(&names) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("drift-guard: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (name, _) in EMBEDDED_SCHEMAS {
            println!("{name}");
        }
    }
    ExitCode::SUCCESS
}
