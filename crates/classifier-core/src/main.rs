mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inference::{ArtifactStore, ClassificationService};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use commands::ErrorBody;
use config::ServiceConfig;

#[derive(Parser)]
#[command(name = "exoplanet-classifier")]
#[command(about = "Classify exoplanet candidates and explain the verdict", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a named-feature request
    Predict {
        /// Request JSON file; read from stdin when omitted
        file: Option<PathBuf>,
    },

    /// Classify a pre-normalized 8-value vector request
    PredictVector {
        /// Request JSON file; read from stdin when omitted
        file: Option<PathBuf>,
    },

    /// Analyze a light-curve request
    Lightcurve {
        /// Request JSON file; read from stdin when omitted
        file: Option<PathBuf>,
    },

    /// Load the configured artifact set and report its version
    CheckArtifacts,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %format!("{err:#}"), "exoplanet-classifier failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = ServiceConfig::load()?;
    let store = Arc::new(ArtifactStore::new(&config.artifacts_dir));
    let service = ClassificationService::new(store, config.service_options());

    info!(
        artifacts = %config.artifacts_dir.display(),
        model = %config.model_version,
        top_k = config.explanation_top_k,
        "exoplanet-classifier started"
    );

    let needs_artifacts = matches!(cli.command, Command::Predict { .. });
    if config.warm_artifacts && needs_artifacts {
        if let Err(err) = service.warm_up() {
            warn!(error = %err, "artifact warm-up failed");
        }
    }

    match cli.command {
        Command::Predict { file } => {
            let raw = commands::read_input(file.as_deref())?;
            emit(commands::predict(&service, &raw))
        }
        Command::PredictVector { file } => {
            let raw = commands::read_input(file.as_deref())?;
            emit(commands::predict_vector(&service, &raw))
        }
        Command::Lightcurve { file } => {
            let raw = commands::read_input(file.as_deref())?;
            emit(commands::analyze_lightcurve(&raw))
        }
        Command::CheckArtifacts => emit(commands::check_artifacts(&service)),
    }
}

fn emit<T: Serialize>(outcome: Result<T, ErrorBody>) -> Result<ExitCode> {
    let (body, code) = match outcome {
        Ok(value) => (
            serde_json::to_string_pretty(&value).context("failed encoding response")?,
            ExitCode::SUCCESS,
        ),
        Err(failure) => (
            serde_json::to_string_pretty(&failure).context("failed encoding error")?,
            ExitCode::from(2),
        ),
    };
    println!("{body}");
    Ok(code)
}
