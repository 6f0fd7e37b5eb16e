//! lefeuille - Roadmap Generation
//!
//! *La Feuille de route* (The Roadmap) - Prompt construction, generative-model access, and
//! strict extraction of the roadmap JSON the model returns

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Error types for generation and extraction.
pub mod error;
/// Raw-text to roadmap extraction and structural validation.
pub mod extract;
/// Generative-text service seam and the Gemini client.
pub mod generator;
/// Instruction text sent to the generative model.
pub mod prompt;
/// Prompting the model for a roadmap with a bounded timeout.
pub mod requester;
/// Retry policies for generation calls.
pub mod retry;
/// The roadmap data model.
pub mod roadmap;

pub use error::{ExtractError, GenerationError, StructureError};
pub use extract::RoadmapExtractor;
pub use generator::{GeminiClient, GeminiConfig, TextGenerator, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
pub use prompt::{role_title, PromptBuilder};
pub use requester::{RoadmapRequester, DEFAULT_TIMEOUT};
pub use retry::RetryPolicy;
pub use roadmap::{GraphEdge, LearningPath, LearningResource, Roadmap};
