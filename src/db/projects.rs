//! Project operations.
//!
//! Projects are the units time is tracked against. Archived projects stay in
//! the database with their history but drop out of default listings and
//! refuse new tracking sessions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempus::db::db::Db;
//!
//! # async fn demo() -> tempus::db::error::DbResult<()> {
//! let db = Db::in_memory();
//! db.initialize().await?;
//!
//! let id = db.add_project("Website").await?;
//! db.archive_project(id).await?;
//! assert!(db.get_projects(false).await?.is_empty());
//! # Ok(())
//! # }
//! ```

use crate::db::db::Db;
use crate::db::error::DbResult;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub(crate) const SELECT_PROJECT: &str = "SELECT id, name, archived FROM projects WHERE id = ?1";

/// Non-archived projects first, then by name. `?1` includes archived rows.
const SELECT_PROJECTS: &str = "SELECT id, name, archived FROM projects
    WHERE archived = 0 OR ?1
    ORDER BY archived ASC, name ASC, id ASC";
const INSERT_PROJECT: &str = "INSERT INTO projects (name, archived) VALUES (?1, 0)";
const UPDATE_NAME: &str = "UPDATE projects SET name = ?2 WHERE id = ?1";
const DELETE_PROJECT: &str = "DELETE FROM projects WHERE id = ?1";
const SET_ARCHIVED: &str = "UPDATE projects SET archived = ?2 WHERE id = ?1";

/// Closes whatever session is still running for a project.
const CLOSE_OPEN_LOGS: &str = "UPDATE time_logs SET end_time = ?2 WHERE project_id = ?1 AND end_time IS NULL";
const DELETE_ALL_LOGS: &str = "DELETE FROM time_logs";
const DELETE_ALL_PROJECTS: &str = "DELETE FROM projects";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub archived: bool,
}

impl Project {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get(0)?,
            name: row.get(1)?,
            archived: row.get::<_, i64>(2)? != 0,
        })
    }
}

impl Db {
    pub async fn get_project(&self, id: i64) -> DbResult<Option<Project>> {
        self.call(move |conn| Ok(conn.query_row(SELECT_PROJECT, params![id], Project::from_row).optional()?))
            .await
    }

    /// Active projects, plus archived ones when `include_archived` is set.
    pub async fn get_projects(&self, include_archived: bool) -> DbResult<Vec<Project>> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(SELECT_PROJECTS)?;
            let projects = stmt
                .query_map(params![include_archived], Project::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(projects)
        })
        .await
    }

    /// Creates an active project and returns its id.
    pub async fn add_project(&self, name: &str) -> DbResult<i64> {
        let name = name.to_string();
        self.call(move |conn| {
            conn.execute(INSERT_PROJECT, params![name])?;
            let id = conn.last_insert_rowid();
            info!(id, name = %name, "project added");
            Ok(id)
        })
        .await
    }

    /// Renames a project. Unknown ids are ignored.
    pub async fn update_project(&self, id: i64, name: &str) -> DbResult<()> {
        let name = name.to_string();
        self.call(move |conn| {
            let affected = conn.execute(UPDATE_NAME, params![id, name])?;
            debug!(id, affected, "project renamed");
            Ok(())
        })
        .await
    }

    pub async fn rename_project(&self, id: i64, name: &str) -> DbResult<()> {
        self.update_project(id, name).await
    }

    /// Deletes a project; its time logs go with it.
    pub async fn delete_project(&self, id: i64) -> DbResult<()> {
        self.call(move |conn| {
            let affected = conn.execute(DELETE_PROJECT, params![id])?;
            info!(id, affected, "project deleted");
            Ok(())
        })
        .await
    }

    /// Archives a project and closes its running session, if any, at "now".
    /// Both writes commit together.
    pub async fn archive_project(&self, id: i64) -> DbResult<()> {
        let now = self.now();
        self.call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(SET_ARCHIVED, params![id, 1])?;
            let closed = tx.execute(CLOSE_OPEN_LOGS, params![id, now])?;
            tx.commit()?;
            info!(id, closed, "project archived");
            Ok(())
        })
        .await
    }

    /// Clears the archived flag. Tracking is not restarted.
    pub async fn unarchive_project(&self, id: i64) -> DbResult<()> {
        self.call(move |conn| {
            conn.execute(SET_ARCHIVED, params![id, 0])?;
            info!(id, "project unarchived");
            Ok(())
        })
        .await
    }

    /// Empties both tables. The schema version is left alone.
    pub async fn reset_database(&self) -> DbResult<()> {
        self.call(|conn| {
            let tx = conn.transaction()?;
            // Logs first, they reference projects
            let logs = tx.execute(DELETE_ALL_LOGS, [])?;
            let projects = tx.execute(DELETE_ALL_PROJECTS, [])?;
            tx.commit()?;
            info!(logs, projects, "database reset");
            Ok(())
        })
        .await
    }
}
