// CLI Interface
//
// This module provides the command-line interface for LeParcours.

use crate::config::PipelineConfig;
use crate::pipeline::Pipeline;
use anyhow::{Context, Result as AnyhowResult};
use clap::{Parser, Subcommand};
use leprofil::SurveyResponse;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log filter
pub const ENV_LOG_LEVEL: &str = "LEPARCOURS_LOG_LEVEL";

/// LeParcours - Career path recommendation from survey answers
#[derive(Parser, Debug)]
#[command(name = "leparcours")]
#[command(author = "LeParcours Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score a career survey, generate a learning roadmap, and maintain its skill graph", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (defaults to .leparcours/config.toml)
    #[arg(global = true, long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline and print the prediction
    Predict {
        /// JSON file with answers q1..q20
        #[arg(long = "answers", value_name = "FILE")]
        answers: PathBuf,
    },

    /// Score and rank a survey without generating a roadmap
    Score {
        /// JSON file with answers q1..q20
        #[arg(long = "answers", value_name = "FILE")]
        answers: PathBuf,
    },

    /// Print the prompt a prediction would send
    Prompt {
        /// JSON file with answers q1..q20
        #[arg(long = "answers", value_name = "FILE")]
        answers: PathBuf,
    },

    /// Print the persisted skill graph
    Graph,

    /// Remove the persisted skill graph
    Reset,
}

impl Cli {
    /// Run the CLI
    pub async fn run(self) -> AnyhowResult<()> {
        init_logging(self.verbose);

        let config = load_config(self.config.as_deref())?;
        let pipeline = Pipeline::from_config(&config)?;

        match self.command {
            Commands::Predict { answers } => {
                let survey = read_survey(&answers)?;
                let prediction = pipeline.predict(&survey).await?;
                print_json(&prediction.response())
            }
            Commands::Score { answers } => {
                let survey = read_survey(&answers)?;
                let (scores, ranked) = pipeline.score(&survey)?;
                print_json(&serde_json::json!({
                    "probabilities": scores.probabilities(),
                    "degraded": scores.is_degraded(),
                    "ranked": ranked,
                }))
            }
            Commands::Prompt { answers } => {
                let survey = read_survey(&answers)?;
                println!("{}", pipeline.prompt(&survey)?);
                Ok(())
            }
            Commands::Graph => print_json(&pipeline.graph()?),
            Commands::Reset => {
                let report = pipeline.reset()?;
                info!(
                    "Removed {} nodes and {} edges",
                    report.nodes_removed, report.edges_removed
                );
                print_json(&serde_json::json!({ "ok": true }))
            }
        }
    }
}

/// Install the global tracing subscriber.
///
/// `--verbose` forces debug; otherwise `LEPARCOURS_LOG_LEVEL`, then
/// `RUST_LOG`, then `info`.
pub fn init_logging(verbose: bool) {
    let directive = log_directive(verbose, |key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Filter directive for the given flag and environment lookup.
///
/// Unset, blank or unparsable values fall through to the next source.
pub fn log_directive<F>(verbose: bool, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if verbose {
        return "debug".to_string();
    }

    [ENV_LOG_LEVEL, "RUST_LOG"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty() && EnvFilter::try_new(value).is_ok())
        .unwrap_or_else(|| "info".to_string())
}

/// Explicit file, else `.leparcours/config.toml` in the working directory,
/// then environment overrides.
fn load_config(explicit: Option<&Path>) -> AnyhowResult<PipelineConfig> {
    let mut config = match explicit {
        Some(path) => PipelineConfig::from_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            PipelineConfig::load(cwd)?
        }
    };
    config.apply_env();
    Ok(config)
}

fn read_survey(path: &Path) -> AnyhowResult<SurveyResponse> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file: {:?}", path))?;
    let body: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Answers file is not JSON: {:?}", path))?;
    SurveyResponse::from_json(&body).with_context(|| format!("Invalid answers in {:?}", path))
}

fn print_json<T: serde::Serialize>(value: &T) -> AnyhowResult<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}
