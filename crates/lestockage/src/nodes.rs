// Skill node persistence operations

use rusqlite::{params, Connection, Result as SqliteResult};

/// Skill node record for database storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SkillNodeRecord {
    /// Skill name; the node's identity
    pub name: String,
    /// Display label
    pub label: String,
}

/// Insert a node unless one with the same name exists.
///
/// Returns `true` when a node was created.
pub(crate) fn merge_node(conn: &Connection, name: &str, label: &str) -> SqliteResult<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO skill_nodes (name, label, created_at) VALUES (?1, ?2, ?3)",
        params![name, label, chrono::Utc::now().timestamp()],
    )?;
    Ok(changed > 0)
}

pub(crate) fn node_exists(conn: &Connection, name: &str) -> SqliteResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM skill_nodes WHERE name = ?1)",
        params![name],
        |row| row.get(0),
    )
}

/// All nodes in insertion order
pub(crate) fn list_nodes(conn: &Connection) -> SqliteResult<Vec<SkillNodeRecord>> {
    let mut stmt =
        conn.prepare("SELECT name, label FROM skill_nodes ORDER BY rowid")?;
    let nodes = stmt
        .query_map([], |row| {
            Ok(SkillNodeRecord {
                name: row.get(0)?,
                label: row.get(1)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(nodes)
}

pub(crate) fn delete_all_nodes(conn: &Connection) -> SqliteResult<usize> {
    conn.execute("DELETE FROM skill_nodes", [])
}
