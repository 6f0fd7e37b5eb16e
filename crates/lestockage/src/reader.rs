// Read-side view of the persisted skill graph

use crate::edges::list_edges;
use crate::error::Result;
use crate::graph::GenerationInfo;
use crate::nodes::list_nodes;
use crate::schema::Storage;
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Node as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Skill name
    pub id: String,
    /// Display label
    pub label: String,
}

/// Edge as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    /// Prerequisite skill
    pub source: String,
    /// Skill it leads to
    pub target: String,
}

/// Snapshot of the persisted graph
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphView {
    /// One entry per distinct node name
    pub nodes: Vec<GraphNode>,
    /// Directed edges
    pub edges: Vec<GraphLink>,
    /// Sync that produced the graph, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationInfo>,
}

/// Reconstructs a [`GraphView`] from the store
pub struct GraphReader<'a> {
    storage: &'a Storage,
}

impl<'a> GraphReader<'a> {
    /// Create a reader
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Read all nodes and edges.
    ///
    /// Edge endpoints with no node record still appear as nodes, labelled
    /// with their name.
    pub fn read(&self) -> Result<GraphView> {
        let conn = self.storage.conn();
        let records = list_nodes(conn)?;
        let links = list_edges(conn)?;

        let mut seen = HashSet::with_capacity(records.len());
        let mut nodes = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.name.clone()) {
                nodes.push(GraphNode {
                    id: record.name,
                    label: record.label,
                });
            }
        }

        let mut edges = Vec::with_capacity(links.len());
        for link in links {
            for endpoint in [&link.source, &link.target] {
                if seen.insert(endpoint.clone()) {
                    warn!("Edge endpoint '{}' has no node record; synthesizing", endpoint);
                    nodes.push(GraphNode {
                        id: endpoint.clone(),
                        label: endpoint.clone(),
                    });
                }
            }
            edges.push(GraphLink {
                source: link.source,
                target: link.target,
            });
        }

        let generation = current_generation(conn)?;
        debug!("Read skill graph: {} nodes, {} edges", nodes.len(), edges.len());

        Ok(GraphView {
            nodes,
            edges,
            generation,
        })
    }
}

fn current_generation(conn: &Connection) -> SqliteResult<Option<GenerationInfo>> {
    conn.query_row(
        "SELECT fingerprint, primary_role, node_count, edge_count, created_at
         FROM graph_generations ORDER BY id DESC LIMIT 1",
        [],
        |row| {
            Ok(GenerationInfo {
                fingerprint: row.get(0)?,
                primary_role: row.get(1)?,
                node_count: row.get::<_, i64>(2)? as usize,
                edge_count: row.get::<_, i64>(3)? as usize,
                created_at: row.get(4)?,
            })
        },
    )
    .optional()
}
