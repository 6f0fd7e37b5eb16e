// Skill graph model and generation fingerprints

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Node and edge set handed to a sync
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillGraph {
    /// Role the graph was generated for
    pub primary_role: Option<String>,
    /// Skill names; duplicates collapse on insert
    pub nodes: Vec<String>,
    /// Directed (source, target) pairs
    pub edges: Vec<(String, String)>,
}

impl SkillGraph {
    /// Build a graph from nodes and edges
    pub fn new<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator<Item = (String, String)>,
    {
        Self {
            primary_role: None,
            nodes: nodes.into_iter().map(Into::into).collect(),
            edges: edges.into_iter().collect(),
        }
    }

    /// Tag the graph with the role it was generated for
    pub fn with_primary_role(mut self, role: impl Into<String>) -> Self {
        self.primary_role = Some(role.into());
        self
    }

    /// Distinct node names
    pub fn distinct_nodes(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(String::as_str).collect()
    }

    /// Distinct edges
    pub fn distinct_edges(&self) -> BTreeSet<(&str, &str)> {
        self.edges
            .iter()
            .map(|(s, t)| (s.as_str(), t.as_str()))
            .collect()
    }

    /// BLAKE3 digest of the canonical (sorted, deduplicated) graph.
    ///
    /// Insertion order and duplicates do not change the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for node in self.distinct_nodes() {
            hasher.update(b"n\0");
            hasher.update(node.as_bytes());
            hasher.update(b"\0");
        }
        for (source, target) in self.distinct_edges() {
            hasher.update(b"e\0");
            hasher.update(source.as_bytes());
            hasher.update(b"\0");
            hasher.update(target.as_bytes());
            hasher.update(b"\0");
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Record of the sync that produced the current graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationInfo {
    /// BLAKE3 fingerprint of the synced graph
    pub fingerprint: String,
    /// Role the graph was generated for
    pub primary_role: Option<String>,
    /// Persisted node count
    pub node_count: usize,
    /// Persisted edge count
    pub edge_count: usize,
    /// Sync time (unix seconds)
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(s: &str, t: &str) -> (String, String) {
        (s.to_string(), t.to_string())
    }

    #[test]
    fn test_fingerprint_ignores_order_and_duplicates() {
        let a = SkillGraph::new(["A", "B", "C"], [edge("A", "B"), edge("B", "C")]);
        let b = SkillGraph::new(["C", "A", "B", "A"], [edge("B", "C"), edge("A", "B"), edge("A", "B")]);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_tracks_direction() {
        let a = SkillGraph::new(["A", "B"], [edge("A", "B")]);
        let b = SkillGraph::new(["A", "B"], [edge("B", "A")]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_separates_names() {
        let a = SkillGraph::new(["ab", "c"], Vec::new());
        let b = SkillGraph::new(["a", "bc"], Vec::new());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
