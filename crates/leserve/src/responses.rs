//! API response types matching frontend contract

use lestockage::{GenerationInfo, GraphLink, GraphNode, GraphView};
use serde::{Deserialize, Serialize};

pub use lepasserelle::PredictionResponse;

/// Body of `GET /graph`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDataResponse {
    /// Graph nodes
    pub nodes: Vec<GraphNode>,

    /// Graph edges
    pub edges: Vec<GraphLink>,

    /// Sync that produced the graph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationInfo>,
}

impl From<GraphView> for GraphDataResponse {
    fn from(view: GraphView) -> Self {
        Self {
            nodes: view.nodes,
            edges: view.edges,
            generation: view.generation,
        }
    }
}

/// Body of `POST /clear_graph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearGraphResponse {
    /// Always true on success
    pub ok: bool,
}

impl ClearGraphResponse {
    /// Successful clear
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" when the graph store answers, "degraded" otherwise
    pub status: String,

    /// Service name
    pub service: String,

    /// Crate version
    pub version: String,

    /// Whether the graph store could be read
    pub graph_store: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_data_empty() {
        let response = GraphDataResponse::from(GraphView::default());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"nodes": [], "edges": []}));
    }

    #[test]
    fn test_clear_graph_shape() {
        let json = serde_json::to_value(ClearGraphResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true}));
    }
}
