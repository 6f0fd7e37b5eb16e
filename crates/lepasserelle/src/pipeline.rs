// Prediction Pipeline
//
// *Le Parcours* (The Path) - Survey to scores to roadmap to persisted skill graph

use crate::config::PipelineConfig;
use crate::errors::{PipelineError, Result};
use anyhow::Context;
use lefeuille::{
    GeminiClient, GeminiConfig, PromptBuilder, RetryPolicy, Roadmap, RoadmapExtractor, RoadmapRequester,
    TextGenerator,
};
use leprofil::{Label, LabelScores, ModelArtifact, RankedLabel, ScoreEngine, SurveyResponse, TopKSelector};
use lestockage::{
    ClearReport, GraphView, SkillGraph, SkillGraphStore, Storage, StorageResult, SyncReport,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Body returned for a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Probability per label
    pub probabilities: BTreeMap<Label, f64>,

    /// Ranked `(label, probability)` pairs, best first
    pub top_3_career_recommendation: Vec<(Label, f64)>,

    /// Generated roadmap
    pub learning_path: Roadmap,
}

/// Everything one prediction produced
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Per-label scores
    pub scores: LabelScores,
    /// Top-K labels
    pub ranked: Vec<RankedLabel>,
    /// Validated roadmap
    pub roadmap: Roadmap,
    /// Outcome of the graph replace
    pub sync: SyncReport,
}

impl Prediction {
    /// Wire response
    pub fn response(&self) -> PredictionResponse {
        PredictionResponse {
            probabilities: self.scores.probabilities(),
            top_3_career_recommendation: self
                .ranked
                .iter()
                .map(|r| (r.label, r.probability))
                .collect(),
            learning_path: self.roadmap.clone(),
        }
    }
}

/// Node and edge set to persist for a roadmap
pub fn skill_graph(roadmap: &Roadmap) -> SkillGraph {
    SkillGraph::new(
        roadmap.graph_nodes.iter().cloned(),
        roadmap
            .graph_edges
            .iter()
            .map(|edge| (edge.source().to_string(), edge.target().to_string())),
    )
    .with_primary_role(roadmap.primary_role.clone())
}

/// Runs predictions against one scoring model, generator and graph store.
///
/// Stages of a prediction run strictly in order. The store lock is taken
/// only for the final replace, after generation has finished, so concurrent
/// predictions serialize their graph writes without waiting on each other's
/// model calls. The last completed replace wins.
pub struct Pipeline<S: SkillGraphStore> {
    engine: ScoreEngine,
    selector: TopKSelector,
    requester: RoadmapRequester,
    extractor: RoadmapExtractor,
    retry: RetryPolicy,
    store: Arc<Mutex<S>>,
}

impl<S: SkillGraphStore> Pipeline<S> {
    /// Create a pipeline with default ranking, timeout and no retries
    pub fn new(engine: ScoreEngine, generator: Arc<dyn TextGenerator>, store: S) -> Self {
        Self {
            engine,
            selector: TopKSelector::default(),
            requester: RoadmapRequester::new(generator),
            extractor: RoadmapExtractor::new(),
            retry: RetryPolicy::None,
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Number of labels handed to generation
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.selector = TopKSelector::new(k);
        self
    }

    /// Retry policy for generation
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Per-attempt generation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.requester = self.requester.with_timeout(timeout);
        self
    }

    /// Prompt settings for generation
    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.requester = self.requester.with_prompt_builder(prompts);
        self
    }

    /// Shared handle to the graph store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Score a survey and pick the top labels
    pub fn score(&self, survey: &SurveyResponse) -> Result<(LabelScores, Vec<RankedLabel>)> {
        let scores = self.engine.score(survey)?;
        if scores.is_degraded() {
            warn!("Some labels were scored from hard decisions only");
        }
        let ranked = self.selector.select(&scores);
        Ok((scores, ranked))
    }

    /// Prompt that a prediction for `survey` would send
    pub fn prompt(&self, survey: &SurveyResponse) -> Result<String> {
        let (_, ranked) = self.score(survey)?;
        Ok(self.requester.prompt(&ranked))
    }

    /// Run a full prediction.
    ///
    /// On any error the persisted graph is left as it was.
    pub async fn predict(&self, survey: &SurveyResponse) -> Result<Prediction> {
        let (scores, ranked) = self.score(survey)?;
        debug!(
            "Ranked labels: {:?}",
            ranked.iter().map(|r| r.label).collect::<Vec<_>>()
        );

        let prompt = self.requester.prompt(&ranked);
        let raw = self
            .retry
            .run(|| self.requester.request_prompt(&prompt))
            .await
            .map_err(|e| {
                warn!("Roadmap generation failed: {}", e);
                PipelineError::from(e)
            })?;

        let roadmap = self.extractor.extract(&raw).map_err(|e| {
            warn!("Roadmap extraction failed: {}", e);
            PipelineError::from(e)
        })?;

        let graph = skill_graph(&roadmap);
        let sync = self.with_store(|store| store.replace(&graph))?;
        info!(
            "Prediction complete: primary role '{}', {} nodes, {} edges",
            roadmap.primary_role, sync.nodes_created, sync.edges_created
        );

        Ok(Prediction {
            scores,
            ranked,
            roadmap,
            sync,
        })
    }

    /// Validate a JSON survey body, then predict
    pub async fn predict_json(&self, body: &Value) -> Result<Prediction> {
        let survey = SurveyResponse::from_json(body).map_err(|e| {
            warn!("Rejected survey: {}", e);
            PipelineError::from(e)
        })?;
        self.predict(&survey).await
    }

    /// Snapshot of the persisted graph
    pub fn graph(&self) -> Result<GraphView> {
        self.with_store(|store| store.read())
    }

    /// Remove every persisted node and edge
    pub fn reset(&self) -> Result<ClearReport> {
        self.with_store(|store| store.clear())
    }

    fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut S) -> StorageResult<T>,
    {
        let mut store = self
            .store
            .lock()
            .map_err(|_| PipelineError::store_unavailable("graph store lock poisoned"))?;
        op(&mut *store).map_err(|e| {
            warn!("Graph store operation failed: {}", e);
            PipelineError::from(e)
        })
    }
}

impl Pipeline<Storage> {
    /// Build the production pipeline: artifact or built-in scorer, Gemini
    /// generator, SQLite graph store.
    pub fn from_config(config: &PipelineConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let engine = match &config.scoring.model_path {
            Some(path) => ModelArtifact::load(path)
                .and_then(ModelArtifact::into_engine)
                .with_context(|| format!("Failed to load model artifact: {:?}", path))?,
            None => ScoreEngine::builtin().context("Failed to build built-in scoring model")?,
        };

        let generation = &config.generation;
        let generator = GeminiClient::new(GeminiConfig {
            endpoint: generation.endpoint.clone(),
            model: generation.model.clone(),
            api_key: generation.api_key.clone(),
            timeout: generation.timeout(),
        })
        .context("Failed to build generative model client")?;

        let storage = Storage::open_with_config(&config.storage.db_path, config.storage.clone())
            .with_context(|| format!("Failed to open graph store: {}", config.storage.db_path))?;

        info!(
            "Pipeline ready: model {}, store {}, top_k {}",
            generation.model, config.storage.db_path, config.scoring.top_k
        );

        Ok(Pipeline::new(engine, Arc::new(generator), storage)
            .with_timeout(generation.timeout())
            .with_prompt_builder(generation.prompt_builder())
            .with_top_k(config.scoring.top_k)
            .with_retry(generation.retry.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lefeuille::GenerationError;
    use lestockage::StorageError;

    const ROADMAP: &str = r#"{
        "primary_role": "Network Security",
        "why_suited": "Strong networking answers",
        "learning_path": {"beginner": ["TCP/IP"], "intermediate": ["Firewalls"], "advanced": []},
        "recommended_certifications": ["CCNA"],
        "recommended_projects": ["Home lab"],
        "graph_nodes": ["TCP/IP", "Firewalls"],
        "graph_edges": [["TCP/IP", "Firewalls"]]
    }"#;

    struct Echo(String);

    #[async_trait::async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct Unreachable;

    impl SkillGraphStore for Unreachable {
        fn replace(&mut self, _graph: &SkillGraph) -> StorageResult<SyncReport> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        fn clear(&mut self) -> StorageResult<ClearReport> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        fn read(&self) -> StorageResult<GraphView> {
            Err(StorageError::Unavailable("connection refused".into()))
        }
    }

    fn survey(value: u8) -> SurveyResponse {
        SurveyResponse::from_answers(&[i64::from(value); 20]).unwrap()
    }

    #[test]
    fn test_skill_graph_from_roadmap() {
        let roadmap = RoadmapExtractor::new().extract(ROADMAP).unwrap();
        let graph = skill_graph(&roadmap);
        assert_eq!(graph.nodes, vec!["TCP/IP", "Firewalls"]);
        assert_eq!(graph.edges, vec![("TCP/IP".to_string(), "Firewalls".to_string())]);
        assert_eq!(graph.primary_role.as_deref(), Some("Network Security"));
    }

    #[test]
    fn test_prompt_and_score_skip_generation() {
        let pipeline = Pipeline::new(
            ScoreEngine::builtin().unwrap(),
            Arc::new(Echo(String::new())),
            Storage::open_in_memory().unwrap(),
        )
        .with_top_k(2);

        let (scores, ranked) = pipeline.score(&survey(5)).unwrap();
        assert_eq!(scores.len(), 9);
        assert_eq!(ranked.len(), 2);

        let prompt = pipeline.prompt(&survey(5)).unwrap();
        assert!(prompt.contains("PRIMARY ROLE"));
        assert!(pipeline.graph().unwrap().nodes.is_empty());
    }

    #[tokio::test]
    async fn test_response_shape() {
        let pipeline = Pipeline::new(
            ScoreEngine::builtin().unwrap(),
            Arc::new(Echo(ROADMAP.to_string())),
            Storage::open_in_memory().unwrap(),
        );

        let prediction = pipeline.predict(&survey(5)).await.unwrap();
        let json = serde_json::to_value(prediction.response()).unwrap();

        assert_eq!(json["probabilities"].as_object().unwrap().len(), 9);
        let top = json["top_3_career_recommendation"].as_array().unwrap();
        assert_eq!(top.len(), 3);
        assert!(top[0][0].is_string());
        assert!(top[0][1].is_f64());
        assert_eq!(json["learning_path"]["graph_edges"][0], serde_json::json!(["TCP/IP", "Firewalls"]));
    }

    #[tokio::test]
    async fn test_store_failure_is_graph_store_kind() {
        let pipeline = Pipeline::new(
            ScoreEngine::builtin().unwrap(),
            Arc::new(Echo(ROADMAP.to_string())),
            Unreachable,
        );

        let err = pipeline.predict(&survey(3)).await.unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::GraphStoreUnavailable);
        assert!(pipeline.graph().is_err());
        assert!(pipeline.reset().is_err());
    }
}
