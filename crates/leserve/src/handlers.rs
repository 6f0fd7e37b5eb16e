//! HTTP handlers for REST API endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use lepasserelle::Pipeline;
use lestockage::SkillGraphStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ApiResult;
use crate::responses::{
    ClearGraphResponse, GraphDataResponse, HealthResponse, PredictionResponse,
};

/// State shared across all handlers
///
/// The pipeline serializes graph store access internally, so handlers
/// share it through a plain `Arc`.
pub struct AppState<S: SkillGraphStore> {
    /// Prediction pipeline and graph store
    pub pipeline: Arc<Pipeline<S>>,

    /// Immutable server configuration
    pub config: Arc<ServerConfig>,
}

impl<S: SkillGraphStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: SkillGraphStore> AppState<S> {
    /// Create a new AppState instance with pipeline and configuration
    pub fn new(pipeline: Pipeline<S>, config: ServerConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }
}

/// POST /predict - Score a survey, generate a roadmap, replace the graph
pub async fn predict<S: SkillGraphStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let Json(body) = body?;
    let prediction = state.pipeline.predict_json(&body).await?;
    info!(
        "Predicted '{}' with {} graph nodes",
        prediction.roadmap.primary_role, prediction.sync.nodes_created
    );
    Ok(Json(prediction.response()))
}

/// GET /graph - Current skill graph
pub async fn get_graph<S: SkillGraphStore + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<GraphDataResponse>> {
    let view = state.pipeline.graph()?;
    Ok(Json(view.into()))
}

/// POST /clear_graph - Remove every node and edge
pub async fn clear_graph<S: SkillGraphStore + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<ClearGraphResponse>> {
    let report = state.pipeline.reset()?;
    info!(
        "Cleared graph: {} nodes, {} edges",
        report.nodes_removed, report.edges_removed
    );
    Ok(Json(ClearGraphResponse::ok()))
}

/// GET /api/health - Health check endpoint
pub async fn health_check<S: SkillGraphStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<HealthResponse> {
    let graph_store = state.pipeline.graph().is_ok();
    Json(HealthResponse {
        status: if graph_store { "ok" } else { "degraded" }.to_string(),
        service: "leserve".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        graph_store,
    })
}

/// Create router with all API endpoints
pub fn create_router<S: SkillGraphStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/predict", post(predict::<S>))
        .route("/graph", get(get_graph::<S>))
        .route("/clear_graph", post(clear_graph::<S>))
        .route("/api/health", get(health_check::<S>))
}
