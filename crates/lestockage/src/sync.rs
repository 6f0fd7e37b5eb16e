// Full-replace graph synchronization
//
// Each replace runs in one SQLite transaction: delete edges, delete nodes,
// insert nodes, insert edges, record the generation. A failure anywhere rolls
// back to the previous graph.

use crate::edges::{delete_all_edges, match_edge, EdgeOutcome};
use crate::error::{Result, StorageError};
use crate::graph::{GenerationInfo, SkillGraph};
use crate::nodes::{delete_all_nodes, merge_node};
use crate::schema::Storage;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Treatment of edges whose endpoints are not persisted nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Abort the sync and keep the previous graph
    #[default]
    Strict,
    /// Skip the edge, log it and report it
    Lenient,
}

/// Outcome of a replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Nodes removed from the previous generation
    pub nodes_removed: usize,
    /// Edges removed from the previous generation
    pub edges_removed: usize,
    /// Distinct nodes written
    pub nodes_created: usize,
    /// Distinct edges written
    pub edges_created: usize,
    /// Edges dropped under the lenient policy
    pub edges_skipped: Vec<(String, String)>,
    /// Generation record for the new graph
    pub generation: GenerationInfo,
}

/// Outcome of a clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClearReport {
    /// Nodes removed
    pub nodes_removed: usize,
    /// Edges removed
    pub edges_removed: usize,
}

/// Replaces or clears the persisted skill graph
pub struct GraphSync<'a> {
    storage: &'a mut Storage,
    policy: EdgePolicy,
}

impl<'a> GraphSync<'a> {
    /// Create a sync using the store's configured edge policy
    pub fn new(storage: &'a mut Storage) -> Self {
        let policy = storage.config().edge_policy;
        Self { storage, policy }
    }

    /// Override the edge policy
    pub fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the whole persisted graph with `graph`
    pub fn replace(&mut self, graph: &SkillGraph) -> Result<SyncReport> {
        let tx = self.storage.conn_mut().transaction()?;

        let edges_removed = delete_all_edges(&tx)?;
        let nodes_removed = delete_all_nodes(&tx)?;
        tx.execute("DELETE FROM graph_generations", [])?;
        debug!(
            "Cleared previous graph ({} nodes, {} edges)",
            nodes_removed, edges_removed
        );

        let mut nodes_created = 0;
        for name in &graph.nodes {
            if merge_node(&tx, name, name)? {
                nodes_created += 1;
            }
        }

        let mut edges_created = 0;
        let mut edges_skipped = Vec::new();
        for (source, target) in &graph.edges {
            let outcome = match_edge(&tx, source, target)?;
            let missing = match outcome {
                EdgeOutcome::Created => {
                    edges_created += 1;
                    continue;
                }
                EdgeOutcome::AlreadyPresent => continue,
                EdgeOutcome::MissingSource => source,
                EdgeOutcome::MissingTarget => target,
            };

            match self.policy {
                EdgePolicy::Strict => {
                    warn!(
                        "Rejecting sync: edge {} -> {} refers to unknown node '{}'",
                        source, target, missing
                    );
                    // Dropping the transaction rolls back
                    return Err(StorageError::UnknownEndpoint {
                        source_name: source.clone(),
                        target: target.clone(),
                        missing: missing.clone(),
                    });
                }
                EdgePolicy::Lenient => {
                    warn!(
                        "Skipping edge {} -> {}: unknown node '{}'",
                        source, target, missing
                    );
                    edges_skipped.push((source.clone(), target.clone()));
                }
            }
        }

        let generation = GenerationInfo {
            fingerprint: graph.fingerprint(),
            primary_role: graph.primary_role.clone(),
            node_count: nodes_created,
            edge_count: edges_created,
            created_at: chrono::Utc::now().timestamp(),
        };
        tx.execute(
            "INSERT INTO graph_generations (fingerprint, primary_role, node_count, edge_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                generation.fingerprint,
                generation.primary_role,
                generation.node_count as i64,
                generation.edge_count as i64,
                generation.created_at,
            ],
        )?;

        tx.commit()?;
        info!(
            "Synced skill graph: {} nodes, {} edges ({} skipped)",
            nodes_created,
            edges_created,
            edges_skipped.len()
        );

        Ok(SyncReport {
            nodes_removed,
            edges_removed,
            nodes_created,
            edges_created,
            edges_skipped,
            generation,
        })
    }

    /// Remove every node, edge and generation record
    pub fn clear(&mut self) -> Result<ClearReport> {
        let tx = self.storage.conn_mut().transaction()?;
        let edges_removed = delete_all_edges(&tx)?;
        let nodes_removed = delete_all_nodes(&tx)?;
        tx.execute("DELETE FROM graph_generations", [])?;
        tx.commit()?;

        info!(
            "Cleared skill graph ({} nodes, {} edges)",
            nodes_removed, edges_removed
        );
        Ok(ClearReport {
            nodes_removed,
            edges_removed,
        })
    }
}
