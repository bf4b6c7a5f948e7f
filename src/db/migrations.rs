//! Versioned schema migrations.
//!
//! The schema evolves through an ordered list of steps, each a version number
//! plus the DDL that gets the database from the previous version to this one.
//! The highest applied version is kept in the single-row `schema_version`
//! table.
//!
//! ## Rules
//!
//! - Steps run in ascending version order, whatever order they were declared in
//! - Only steps above the stored version run; re-running is a no-op
//! - Each step commits together with its version marker, so after a failure the
//!   marker names the last step that actually completed and a retry resumes
//!   right after it
//! - A missing or unreadable `schema_version` table reads as version 0
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempus::db::migrations::{get_db_version, MigrationManager};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! let applied = MigrationManager::new().run_migrations(&mut conn)?;
//! assert_eq!(get_db_version(&conn), 4);
//! # Ok::<(), tempus::db::error::DbError>(())
//! ```

use crate::db::error::{DbError, DbResult};
use rusqlite::{params, Connection};
use tracing::{debug, info};

/// Tracking table for the applied schema version.
const SCHEMA_VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)";
const SELECT_VERSION: &str = "SELECT MAX(version) FROM schema_version";
const CLEAR_VERSION: &str = "DELETE FROM schema_version";
const INSERT_VERSION: &str = "INSERT INTO schema_version (version) VALUES (?1)";

/// One schema step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Unique, strictly positive version number
    pub version: u32,
    /// Short description, used in logs and errors
    pub name: &'static str,
    /// DDL executed as a batch; may hold several statements
    pub sql: &'static str,
}

impl Migration {
    pub const fn new(version: u32, name: &'static str, sql: &'static str) -> Self {
        Self { version, name, sql }
    }
}

/// The schema of the application, newest step last.
pub const MIGRATIONS: &[Migration] = &[
    Migration::new(
        1,
        "create_projects",
        "CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
    ),
    Migration::new(
        2,
        "create_time_logs",
        "CREATE TABLE IF NOT EXISTS time_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL,
            start_time INTEGER NOT NULL,
            end_time INTEGER,
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
        )",
    ),
    Migration::new(3, "add_project_archived", "ALTER TABLE projects ADD COLUMN archived INTEGER NOT NULL DEFAULT 0"),
    Migration::new(
        4,
        "index_time_logs_project",
        "CREATE INDEX IF NOT EXISTS idx_time_logs_project_start ON time_logs(project_id, start_time)",
    ),
];

/// Applies a list of [`Migration`]s to a connection.
#[derive(Debug, Clone)]
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    /// Manager for the application schema ([`MIGRATIONS`]).
    pub fn new() -> Self {
        Self::with_migrations(MIGRATIONS.to_vec())
    }

    /// Manager for an arbitrary step list. Steps are sorted by version.
    pub fn with_migrations(mut migrations: Vec<Migration>) -> Self {
        migrations.sort_by_key(|m| m.version);
        Self { migrations }
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Highest version this manager knows about, 0 for an empty list.
    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Steps above `current`, in the order they would run.
    pub fn pending(&self, current: u32) -> Vec<&Migration> {
        self.migrations.iter().filter(|m| m.version > current).collect()
    }

    /// Applies every pending step and returns how many ran.
    pub fn run_migrations(&self, conn: &mut Connection) -> DbResult<usize> {
        let mut version = get_db_version(conn);
        conn.execute(SCHEMA_VERSION_TABLE, [])?;

        let pending = self.pending(version);
        if pending.is_empty() {
            debug!(version, "database is up to date");
            return Ok(0);
        }
        info!(count = pending.len(), from = version, "applying migrations");

        let mut applied = 0;
        for migration in pending {
            // Duplicate version numbers collapse onto the first step
            if migration.version <= version {
                continue;
            }

            let tx = conn.transaction()?;
            tx.execute_batch(migration.sql).map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
            tx.execute(CLEAR_VERSION, [])?;
            tx.execute(INSERT_VERSION, params![migration.version])?;
            tx.commit()?;

            info!(version = migration.version, name = migration.name, "migration applied");
            version = migration.version;
            applied += 1;
        }

        Ok(applied)
    }

    /// True when the database is behind this manager's latest step.
    pub fn needs_migration(&self, conn: &Connection) -> bool {
        get_db_version(conn) < self.latest_version()
    }
}

/// Stored schema version; 0 when nothing was ever applied or the tracking
/// table cannot be read.
pub fn get_db_version(conn: &Connection) -> u32 {
    match conn.query_row(SELECT_VERSION, [], |row| row.get::<_, Option<u32>>(0)) {
        Ok(version) => version.unwrap_or(0),
        Err(err) => {
            debug!(error = %err, "schema version unreadable, assuming 0");
            0
        }
    }
}

/// Whether the application schema has steps the database has not seen.
pub fn needs_migration(conn: &Connection) -> bool {
    MigrationManager::new().needs_migration(conn)
}

/// Initializes a bare connection with the application schema.
pub fn init_with_migrations(conn: &mut Connection) -> DbResult<usize> {
    MigrationManager::new().run_migrations(conn)
}
