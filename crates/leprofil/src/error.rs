// Scoring error types

use crate::labels::Label;
use thiserror::Error;

/// Rejection of survey input before any classifier runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyError {
    /// Wrong number of answers
    #[error("expected {expected} answers, got {actual}")]
    WrongLength {
        /// Required answer count
        expected: usize,
        /// Supplied answer count
        actual: usize,
    },

    /// A question key is absent from the submitted object
    #[error("missing answer for q{question}")]
    MissingAnswer {
        /// 1-based question number
        question: usize,
    },

    /// The answer is not an integer
    #[error("answer for q{question} is not an integer")]
    NotAnInteger {
        /// 1-based question number
        question: usize,
    },

    /// The answer falls outside the ordinal scale
    #[error("answer for q{question} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// 1-based question number
        question: usize,
        /// Submitted value
        value: i64,
        /// Lowest accepted value
        min: i64,
        /// Highest accepted value
        max: i64,
    },

    /// The submitted body is not a JSON object or array
    #[error("survey must be a JSON object with keys q1..q{expected} or an array of {expected} answers")]
    NotAnObject {
        /// Required answer count
        expected: usize,
    },
}

/// Fault inside a single label classifier
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// Feature vector does not match the classifier's input width
    #[error("feature width mismatch: expected {expected}, got {actual}")]
    FeatureWidth {
        /// Width the classifier was built for
        expected: usize,
        /// Width of the supplied vector
        actual: usize,
    },

    /// The classifier produced a value that is not a probability
    #[error("classifier produced a non-finite score")]
    NonFinite,

    /// Any other failure reported by a classifier implementation
    #[error("{0}")]
    Other(String),
}

/// Whole-request scoring failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A label's classifier failed
    #[error("scoring failed for label '{label}': {source}")]
    Classifier {
        /// Label whose classifier failed
        label: Label,
        /// Underlying classifier fault
        #[source]
        source: ClassifierError,
    },

    /// Probability outside [0, 1]
    #[error("label '{label}' produced probability {value} outside [0, 1]")]
    OutOfBounds {
        /// Offending label
        label: Label,
        /// Reported value
        value: f64,
    },
}

/// Failure loading or validating a classifier artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Artifact file could not be read
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        /// Artifact path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON for the expected schema
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact names a label outside the fixed set
    #[error("unknown label in model artifact: {0}")]
    UnknownLabel(String),

    /// Artifact does not cover a required label
    #[error("model artifact has no classifier for label '{0}'")]
    MissingLabel(Label),

    /// Classifier parameters are inconsistent
    #[error("invalid classifier for label '{label}': {reason}")]
    InvalidClassifier {
        /// Label of the bad classifier
        label: Label,
        /// Explanation
        reason: String,
    },
}
