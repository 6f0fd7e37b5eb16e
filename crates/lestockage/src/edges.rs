// Skill edge persistence operations

use crate::nodes::node_exists;
use rusqlite::{params, Connection, Result as SqliteResult};

/// Relation stored on every skill edge
pub(crate) const LEADS_TO: &str = "LEADS_TO";

/// Edge record for database storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SkillEdgeRecord {
    /// Prerequisite skill
    pub source: String,
    /// Skill it leads to
    pub target: String,
}

/// Result of a match-based edge insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeOutcome {
    /// New edge persisted
    Created,
    /// Same (source, target) already persisted
    AlreadyPresent,
    /// Source has no node record; nothing written
    MissingSource,
    /// Target has no node record; nothing written
    MissingTarget,
}

/// Link two existing nodes.
///
/// Both endpoints must already be persisted; otherwise the edge is not
/// created and the missing side is reported.
pub(crate) fn match_edge(conn: &Connection, source: &str, target: &str) -> SqliteResult<EdgeOutcome> {
    if !node_exists(conn, source)? {
        return Ok(EdgeOutcome::MissingSource);
    }
    if !node_exists(conn, target)? {
        return Ok(EdgeOutcome::MissingTarget);
    }

    let changed = conn.execute(
        "INSERT OR IGNORE INTO skill_edges (source, target, relation, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        params![source, target, LEADS_TO, chrono::Utc::now().timestamp()],
    )?;

    Ok(if changed > 0 {
        EdgeOutcome::Created
    } else {
        EdgeOutcome::AlreadyPresent
    })
}

/// All edges in insertion order
pub(crate) fn list_edges(conn: &Connection) -> SqliteResult<Vec<SkillEdgeRecord>> {
    let mut stmt =
        conn.prepare("SELECT source, target FROM skill_edges ORDER BY rowid")?;
    let edges = stmt
        .query_map([], |row| {
            Ok(SkillEdgeRecord {
                source: row.get(0)?,
                target: row.get(1)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(edges)
}

pub(crate) fn delete_all_edges(conn: &Connection) -> SqliteResult<usize> {
    conn.execute("DELETE FROM skill_edges", [])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Storage;
    use crate::nodes::merge_node;
    
    fn seeded() -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        for name in ["Networking", "Packet Analysis"] {
            merge_node(storage.conn(), name, name).unwrap();
        }
        storage
    }

    #[test]
    fn test_link_and_relink() {
        let storage = seeded();
        let conn = storage.conn();

        assert_eq!(
            match_edge(conn, "Networking", "Packet Analysis").unwrap(),
            EdgeOutcome::Created
        );
        assert_eq!(
            match_edge(conn, "Networking", "Packet Analysis").unwrap(),
            EdgeOutcome::AlreadyPresent
        );

        assert_eq!(list_edges(conn).unwrap().len(), 1);
        let relation: String = conn
            .query_row("SELECT relation FROM skill_edges", [], |row| row.get(0))
            .unwrap();
        assert_eq!(relation, LEADS_TO);
    }

    #[test]
    fn test_missing_endpoint_writes_nothing() {
        let storage = seeded();
        let conn = storage.conn();

        assert_eq!(
            match_edge(conn, "Networkng", "Packet Analysis").unwrap(),
            EdgeOutcome::MissingSource
        );
        assert_eq!(
            match_edge(conn, "Networking", "IDS Tuning").unwrap(),
            EdgeOutcome::MissingTarget
        );
        assert!(list_edges(conn).unwrap().is_empty());
    }
}
