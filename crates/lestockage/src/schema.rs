// Storage schema and database management

use crate::sync::EdgePolicy;
use rusqlite::{Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database path
    pub db_path: String,

    /// Whether to enable WAL mode
    pub wal_enabled: bool,

    /// Cache size in pages
    pub cache_size_pages: Option<usize>,

    /// What a sync does with edges whose endpoints are not nodes
    pub edge_policy: EdgePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "leparcours.db".to_string(),
            wal_enabled: true,
            cache_size_pages: Some(2000),
            edge_policy: EdgePolicy::default(),
        }
    }
}

/// Main storage interface
pub struct Storage {
    conn: Connection,
    config: StorageConfig,
}

impl Storage {
    /// Open storage with default config
    pub fn open<P: AsRef<Path>>(path: P) -> SqliteResult<Self> {
        Self::open_with_config(path, StorageConfig::default())
    }

    /// Open storage with custom config
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: StorageConfig) -> SqliteResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!("Opened skill graph store at {}", path.as_ref().display());
        Self::from_connection(conn, config)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> SqliteResult<Self> {
        let config = StorageConfig {
            db_path: ":memory:".to_string(),
            wal_enabled: false,
            ..StorageConfig::default()
        };
        Self::from_connection(Connection::open_in_memory()?, config)
    }

    fn from_connection(conn: Connection, config: StorageConfig) -> SqliteResult<Self> {
        if config.wal_enabled {
            // Returns the resulting mode as a row
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        }

        if let Some(cache_size) = config.cache_size_pages {
            conn.pragma_update(None, "cache_size", cache_size)?;
        }

        let mut storage = Self { conn, config };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Initialize database schema
    fn initialize_schema(&mut self) -> SqliteResult<()> {
        // Node identity is the skill name
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS skill_nodes (
                name TEXT PRIMARY KEY,
                label TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        // No foreign keys: endpoint existence is checked at insert time
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS skill_edges (
                source TEXT NOT NULL,
                target TEXT NOT NULL,
                relation TEXT NOT NULL DEFAULT 'LEADS_TO',
                created_at INTEGER NOT NULL,
                PRIMARY KEY(source, target)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS graph_generations (
                id INTEGER PRIMARY KEY,
                fingerprint TEXT NOT NULL,
                primary_role TEXT,
                node_count INTEGER NOT NULL,
                edge_count INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_skill_edges_target ON skill_edges(target)",
            [],
        )?;

        Ok(())
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Get mutable connection
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Active configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Checkpoint the WAL into the main database file
    pub fn close(&mut self) -> SqliteResult<()> {
        if self.config.wal_enabled {
            self.conn
                .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().unwrap();
        let storage = Storage::open(temp_file.path());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_schema_initialization() {
        let storage = Storage::open_in_memory().unwrap();

        let table_count: i64 = storage
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('skill_nodes', 'skill_edges', 'graph_generations')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 3);
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let temp_file = NamedTempFile::new().unwrap();
        {
            let mut storage = Storage::open(temp_file.path()).unwrap();
            storage
                .conn()
                .execute(
                    "INSERT INTO skill_nodes (name, label, created_at) VALUES ('Linux', 'Linux', 0)",
                    [],
                )
                .unwrap();
            storage.close().unwrap();
        }
        let storage = Storage::open(temp_file.path()).unwrap();
        let count: i64 = storage
            .conn()
            .query_row("SELECT COUNT(*) FROM skill_nodes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
