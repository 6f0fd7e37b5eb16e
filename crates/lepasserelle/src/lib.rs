//! lepasserelle - Pipeline & CLI
//!
//! *La Passerelle* (The Bridge) - Joins scoring, roadmap generation, and skill graph storage

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Command-line interface
pub mod cli;

/// TOML configuration with environment overrides
pub mod config;

/// Pipeline error taxonomy
pub mod errors;

/// Prediction pipeline
pub mod pipeline;

pub use config::PipelineConfig;
pub use errors::{ErrorKind, PipelineError};
pub use pipeline::{skill_graph, Pipeline, Prediction, PredictionResponse};
