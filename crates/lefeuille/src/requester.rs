// Roadmap requests against the generative model

use crate::error::GenerationError;
use crate::generator::TextGenerator;
use crate::prompt::PromptBuilder;
use leprofil::RankedLabel;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Default bound on a single generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Prompts the generative model with the ranked roles and returns its raw
/// text. Makes exactly one call per request; retrying is left to the caller.
#[derive(Clone)]
pub struct RoadmapRequester {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl RoadmapRequester {
    /// Create a requester with the default prompt and timeout
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the generation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the prompt builder
    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Prompt that would be sent for `ranked`
    pub fn prompt(&self, ranked: &[RankedLabel]) -> String {
        self.prompts.build(ranked)
    }

    /// Build the prompt and call the model once
    pub async fn request(&self, ranked: &[RankedLabel]) -> Result<String, GenerationError> {
        let prompt = self.prompt(ranked);
        self.request_prompt(&prompt).await
    }

    /// Call the model once with a prepared prompt.
    ///
    /// The raw response is returned unmodified.
    pub async fn request_prompt(&self, prompt: &str) -> Result<String, GenerationError> {
        info!(
            "Requesting roadmap from {} (timeout {:?})",
            self.generator.name(),
            self.timeout
        );

        match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(Ok(raw)) => {
                info!("Received {} bytes from {}", raw.len(), self.generator.name());
                Ok(raw)
            }
            Ok(Err(err)) => {
                warn!("Generation failed: {}", err);
                Err(err)
            }
            Err(_) => {
                warn!("Generation timed out after {:?}", self.timeout);
                Err(GenerationError::Timeout(self.timeout))
            }
        }
    }
}

impl std::fmt::Debug for RoadmapRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadmapRequester")
            .field("generator", &self.generator.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
