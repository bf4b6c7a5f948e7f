//! Error type shared by the migrator and the data access layer.
//!
//! Store failures are wrapped, never reinterpreted: a rejected foreign key
//! surfaces as [`DbError::Sqlite`] carrying the original rusqlite error so the
//! caller can inspect it with [`DbError::is_constraint_violation`].

use thiserror::Error;

pub type DbResult<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// A data operation ran before [`crate::db::db::Db::initialize`].
    #[error("Database not initialized. Call initialize() first")]
    Uninitialized,

    #[error("Cannot track archived project {0}")]
    ArchivedProject(i64),

    #[error("Project {project_id} is already being tracked by time log {log_id}")]
    AlreadyTracking { project_id: i64, log_id: i64 },

    #[error("Time log ends before it starts ({start_time} > {end_time})")]
    InvalidTimeRange { start_time: i64, end_time: i64 },

    #[error("Migration v{version} ({name}) failed: {source}")]
    Migration {
        version: u32,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DbError {
    /// True when SQLite rejected the statement because of a constraint
    /// (foreign key, NOT NULL, UNIQUE...).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => err.code == rusqlite::ErrorCode::ConstraintViolation,
            _ => false,
        }
    }
}
