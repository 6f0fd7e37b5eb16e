// Store seam used by the pipeline

use crate::error::Result;
use crate::graph::SkillGraph;
use crate::reader::{GraphReader, GraphView};
use crate::schema::Storage;
use crate::sync::{ClearReport, GraphSync, SyncReport};

/// Operations the pipeline needs from a skill-graph store.
///
/// Implemented by [`Storage`]; tests substitute counting or failing fakes.
pub trait SkillGraphStore: Send {
    /// Replace the persisted graph
    fn replace(&mut self, graph: &SkillGraph) -> Result<SyncReport>;

    /// Remove the persisted graph
    fn clear(&mut self) -> Result<ClearReport>;

    /// Snapshot the persisted graph
    fn read(&self) -> Result<GraphView>;
}

impl SkillGraphStore for Storage {
    fn replace(&mut self, graph: &SkillGraph) -> Result<SyncReport> {
        GraphSync::new(self).replace(graph)
    }

    fn clear(&mut self) -> Result<ClearReport> {
        GraphSync::new(self).clear()
    }

    fn read(&self) -> Result<GraphView> {
        GraphReader::new(self).read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(store: &mut dyn SkillGraphStore) {
        let graph = SkillGraph::new(["A", "B"], [("A".to_string(), "B".to_string())]);
        store.replace(&graph).unwrap();
        assert_eq!(store.read().unwrap().edges.len(), 1);
        store.clear().unwrap();
        assert!(store.read().unwrap().nodes.is_empty());
    }

    #[test]
    fn test_storage_as_trait_object() {
        let mut storage = Storage::open_in_memory().unwrap();
        round_trip(&mut storage);
    }
}
