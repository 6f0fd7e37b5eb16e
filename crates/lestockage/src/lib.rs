//! lestockage - Persistent Storage Layer
//!
//! *Le Stockage* (The Storage) - SQLite skill graph with full-replace synchronization

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

mod edges;
/// Storage error types.
pub mod error;
/// Skill graph model and generation fingerprints.
pub mod graph;
mod nodes;
/// Read-side view of the persisted graph.
pub mod reader;
/// Database schema and connection management.
pub mod schema;
/// Store seam consumed by the pipeline.
pub mod store;
/// Full-replace synchronization of the persisted graph.
pub mod sync;

pub use error::{Result as StorageResult, StorageError};
pub use graph::{GenerationInfo, SkillGraph};
pub use reader::{GraphLink, GraphNode, GraphReader, GraphView};
pub use schema::{Storage, StorageConfig};
pub use store::SkillGraphStore;
pub use sync::{ClearReport, EdgePolicy, GraphSync, SyncReport};
