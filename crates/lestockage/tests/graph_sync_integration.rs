// Replace/read/clear against an on-disk store

use lestockage::{
    EdgePolicy, GraphReader, GraphSync, SkillGraph, SkillGraphStore, Storage, StorageConfig,
};
use tempfile::NamedTempFile;

fn edge(s: &str, t: &str) -> (String, String) {
    (s.to_string(), t.to_string())
}

#[test]
fn test_latest_roadmap_wins_across_reopen() {
    let temp_file = NamedTempFile::new().unwrap();

    {
        let mut storage = Storage::open(temp_file.path()).unwrap();
        let first = SkillGraph::new(
            ["Networking", "Firewalls", "VPNs"],
            [edge("Networking", "Firewalls"), edge("Firewalls", "VPNs")],
        )
        .with_primary_role("network");
        storage.replace(&first).unwrap();

        let second = SkillGraph::new(["Risk Assessment", "ISO 27001"], [edge("Risk Assessment", "ISO 27001")])
            .with_primary_role("grc");
        storage.replace(&second).unwrap();
        storage.close().unwrap();
    }

    let storage = Storage::open(temp_file.path()).unwrap();
    let view = GraphReader::new(&storage).read().unwrap();
    assert_eq!(
        view.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        vec!["Risk Assessment", "ISO 27001"]
    );
    assert_eq!(view.edges.len(), 1);
    assert_eq!(view.generation.unwrap().primary_role.as_deref(), Some("grc"));
}

#[test]
fn test_configured_policy_applies() {
    let temp_file = NamedTempFile::new().unwrap();
    let config = StorageConfig {
        db_path: temp_file.path().display().to_string(),
        edge_policy: EdgePolicy::Lenient,
        ..StorageConfig::default()
    };
    let mut storage = Storage::open_with_config(temp_file.path(), config).unwrap();

    let graph = SkillGraph::new(["A"], [edge("A", "Missing")]);
    let report = GraphSync::new(&mut storage).replace(&graph).unwrap();
    assert_eq!(report.edges_created, 0);
    assert_eq!(report.edges_skipped.len(), 1);
    assert_eq!(storage.read().unwrap().nodes.len(), 1);
}

#[test]
fn test_repeated_identical_sync_is_stable() {
    let mut storage = Storage::open_in_memory().unwrap();
    let graph = SkillGraph::new(["A", "B", "C"], [edge("A", "B"), edge("B", "C")]);

    let first = storage.replace(&graph).unwrap();
    let second = storage.replace(&graph).unwrap();
    assert_eq!(first.generation.fingerprint, second.generation.fingerprint);
    assert_eq!(second.nodes_removed, 3);
    assert_eq!(second.nodes_created, 3);

    let view = storage.read().unwrap();
    assert_eq!(view.nodes.len(), 3);
    assert_eq!(view.edges.len(), 2);
}
