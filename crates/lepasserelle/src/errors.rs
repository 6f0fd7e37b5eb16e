// Pipeline Errors
//
// *La Gestion des Erreurs* (The Error Management) - One error type per pipeline stage

use lefeuille::{ExtractError, GenerationError};
use leprofil::{ScoringError, SurveyError};
use lestockage::StorageError;
use serde::Serialize;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Externally observable failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Survey answers missing or malformed
    InvalidInput,
    /// A classifier failed or misbehaved
    ScoringFailed,
    /// The generative model could not be reached in time
    GenerationUnavailable,
    /// Generated text held no JSON object
    NoJsonFound,
    /// Generated JSON did not parse
    MalformedJson,
    /// Generated JSON did not have the roadmap shape
    InvalidRoadmap,
    /// The graph store could not be read or written
    GraphStoreUnavailable,
}

impl ErrorKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::ScoringFailed => "SCORING_FAILED",
            ErrorKind::GenerationUnavailable => "GENERATION_UNAVAILABLE",
            ErrorKind::NoJsonFound => "NO_JSON_FOUND",
            ErrorKind::MalformedJson => "MALFORMED_JSON",
            ErrorKind::InvalidRoadmap => "INVALID_ROADMAP",
            ErrorKind::GraphStoreUnavailable => "GRAPH_STORE_UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Failure of one prediction, graph read, or reset
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rejected before any model ran
    #[error("invalid survey: {0}")]
    InvalidInput(#[from] SurveyError),

    /// Scoring aborted; no partial results
    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    /// Generation failed, possibly after retries
    #[error("roadmap generation unavailable: {0}")]
    GenerationUnavailable(#[from] GenerationError),

    /// Generated text could not be turned into a roadmap
    #[error("roadmap rejected: {0}")]
    Roadmap(#[from] ExtractError),

    /// Graph store failure
    #[error("graph store unavailable: {0}")]
    GraphStore(#[from] StorageError),
}

impl PipelineError {
    /// Create a graph store error for a store that cannot be reached
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        PipelineError::GraphStore(StorageError::Unavailable(message.into()))
    }

    /// Externally observable kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InvalidInput(_) => ErrorKind::InvalidInput,
            PipelineError::Scoring(_) => ErrorKind::ScoringFailed,
            PipelineError::GenerationUnavailable(_) => ErrorKind::GenerationUnavailable,
            PipelineError::Roadmap(ExtractError::NoJson { .. }) => ErrorKind::NoJsonFound,
            PipelineError::Roadmap(ExtractError::MalformedJson { .. }) => ErrorKind::MalformedJson,
            PipelineError::Roadmap(ExtractError::InvalidStructure(_)) => ErrorKind::InvalidRoadmap,
            PipelineError::GraphStore(_) => ErrorKind::GraphStoreUnavailable,
        }
    }

    /// Short detail string for callers, without the stage prefix
    pub fn detail(&self) -> String {
        match self {
            PipelineError::InvalidInput(e) => e.to_string(),
            PipelineError::Scoring(e) => e.to_string(),
            PipelineError::GenerationUnavailable(e) => e.to_string(),
            PipelineError::Roadmap(e) => e.to_string(),
            PipelineError::GraphStore(e) => e.to_string(),
        }
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::GenerationUnavailable(e) => e.is_retryable(),
            PipelineError::GraphStore(_) => true,
            _ => false,
        }
    }

    /// Get user-friendly suggestion for recovery
    pub fn suggestion(&self) -> Option<String> {
        match self {
            PipelineError::InvalidInput(_) => Some(
                "Answer every question q1..q20 with an integer from 1 to 5.".to_string(),
            ),
            PipelineError::GenerationUnavailable(GenerationError::Auth(_)) => {
                Some("Set GENAI_API_KEY or generation.api_key in the config file.".to_string())
            }
            PipelineError::GenerationUnavailable(_) => Some(
                "Try again later or configure a retry policy under [generation.retry].".to_string(),
            ),
            PipelineError::Roadmap(_) => {
                Some("The model reply was unusable; submitting again may help.".to_string())
            }
            PipelineError::GraphStore(_) => {
                Some("Check that storage.db_path is writable.".to_string())
            }
            PipelineError::Scoring(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lefeuille::StructureError;
    use rstest::rstest;
    use std::time::Duration;

    fn malformed() -> ExtractError {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        ExtractError::MalformedJson {
            payload: "{".to_string(),
            source,
        }
    }

    #[rstest]
    #[case(PipelineError::InvalidInput(SurveyError::MissingAnswer { question: 3 }), "INVALID_INPUT")]
    #[case(PipelineError::GenerationUnavailable(GenerationError::Timeout(Duration::from_secs(30))), "GENERATION_UNAVAILABLE")]
    #[case(PipelineError::Roadmap(ExtractError::NoJson { raw: "sorry".into() }), "NO_JSON_FOUND")]
    #[case(PipelineError::Roadmap(malformed()), "MALFORMED_JSON")]
    #[case(PipelineError::Roadmap(StructureError::NotAnObject.into()), "INVALID_ROADMAP")]
    #[case(PipelineError::store_unavailable("lock poisoned"), "GRAPH_STORE_UNAVAILABLE")]
    fn test_kind_codes(#[case] error: PipelineError, #[case] code: &str) {
        assert_eq!(error.kind().code(), code);
    }

    #[test]
    fn test_retryable_kinds() {
        let timeout = PipelineError::from(GenerationError::Timeout(Duration::from_secs(1)));
        assert!(timeout.is_retryable());
        assert!(PipelineError::store_unavailable("down").is_retryable());

        let auth = PipelineError::from(GenerationError::Auth("bad key".into()));
        assert!(!auth.is_retryable());
        assert!(auth.suggestion().unwrap().contains("GENAI_API_KEY"));

        let invalid = PipelineError::from(SurveyError::MissingAnswer { question: 1 });
        assert!(!invalid.is_retryable());
    }

    #[test]
    fn test_detail_omits_stage_prefix() {
        let error = PipelineError::from(SurveyError::MissingAnswer { question: 7 });
        assert_eq!(error.detail(), "missing answer for q7");
        assert!(error.to_string().starts_with("invalid survey"));
    }
}
