//! leprofil - Affinity Profiling
//!
//! *Le Profil* (The Profile) - Survey validation, per-label affinity scoring, and top-K ranking

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Serialized per-label classifier artifacts.
pub mod artifact;
/// Binary classifiers applied to survey feature vectors.
pub mod classifier;
/// Error types for survey validation and scoring.
pub mod error;
/// The fixed set of career labels.
pub mod labels;
/// Top-K selection over label scores.
pub mod ranking;
/// Per-label probability scoring.
pub mod score;
/// Survey answers and their validation.
pub mod survey;

pub use artifact::{ClassifierSpec, ModelArtifact};
pub use classifier::{LabelClassifier, LogisticClassifier, ThresholdClassifier};
pub use error::{ArtifactError, ClassifierError, ScoringError, SurveyError};
pub use labels::Label;
pub use ranking::{RankedLabel, TopKSelector, DEFAULT_TOP_K};
pub use score::{LabelScore, LabelScores, ScoreEngine, ScoreSource};
pub use survey::{SurveyResponse, MAX_ANSWER, MIN_ANSWER, QUESTION_COUNT};
