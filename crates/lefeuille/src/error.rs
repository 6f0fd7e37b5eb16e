// Generation and extraction error types

use std::time::Duration;
use thiserror::Error;

/// The generative model could not be reached or refused the request.
///
/// Every variant is a "generation unavailable" condition; callers map them to
/// a retryable service-unavailable outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No response within the configured bound
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, DNS or I/O failure
    #[error("network error contacting generative model: {0}")]
    Network(String),

    /// Credentials missing or rejected
    #[error("generative model rejected credentials: {0}")]
    Auth(String),

    /// Rate limit or quota exhausted
    #[error("generative model quota exhausted: {0}")]
    Quota(String),

    /// Any other non-success API response
    #[error("generative model API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The service answered without any text
    #[error("generative model returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// Whether trying again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout(_)
            | GenerationError::Network(_)
            | GenerationError::Quota(_)
            | GenerationError::EmptyResponse => true,
            GenerationError::Api { status, .. } => *status >= 500,
            GenerationError::Auth(_) => false,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not report the bound it hit
            GenerationError::Timeout(Duration::ZERO)
        } else if let Some(status) = err.status() {
            GenerationError::Api {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

/// Roadmap violates a structural invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Top-level value is not an object
    #[error("roadmap must be a JSON object")]
    NotAnObject,

    /// Required key absent
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// Key present with the wrong JSON type
    #[error("field '{field}' must be {expected}")]
    WrongType {
        /// Dotted path of the field
        field: String,
        /// Expected shape
        expected: &'static str,
    },

    /// A learning-path skill is not a graph node
    #[error("learning path {tier} skill '{skill}' is not declared in graph_nodes")]
    UndeclaredSkill {
        /// beginner, intermediate or advanced
        tier: &'static str,
        /// Offending skill name
        skill: String,
    },

    /// An edge references an undeclared node
    #[error("graph edge {index} ({source_name} -> {target}) references undeclared node '{missing}'")]
    UndeclaredEndpoint {
        /// Position in graph_edges
        index: usize,
        /// Edge source
        source_name: String,
        /// Edge target
        target: String,
        /// The endpoint that is not a node
        missing: String,
    },
}

/// Raw generative output could not be turned into a roadmap.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No `{ ... }` span in the text
    #[error("no JSON object found in generated text")]
    NoJson {
        /// Full raw text, for diagnostics
        raw: String,
    },

    /// The `{ ... }` span is not valid JSON
    #[error("generated JSON is malformed: {source}")]
    MalformedJson {
        /// Candidate substring that failed to parse
        payload: String,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// Parsed JSON does not have the roadmap shape
    #[error("invalid roadmap structure: {0}")]
    InvalidStructure(#[from] StructureError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GenerationError::Timeout(Duration::from_secs(30)), true)]
    #[case(GenerationError::Network("reset".into()), true)]
    #[case(GenerationError::Quota("429".into()), true)]
    #[case(GenerationError::Auth("401".into()), false)]
    #[case(GenerationError::Api { status: 503, body: String::new() }, true)]
    #[case(GenerationError::Api { status: 400, body: String::new() }, false)]
    fn test_retryable_classification(#[case] err: GenerationError, #[case] retryable: bool) {
        assert_eq!(err.is_retryable(), retryable);
    }
}
