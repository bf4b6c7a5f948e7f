//! Time log operations: tracking sessions and elapsed time.
//!
//! A time log is one interval of work on a project. Timestamps are epoch
//! milliseconds; a log whose `end_time` is `NULL` is the project's running
//! session. Each project has at most one running session at a time.
//!
//! Elapsed time is reported in whole seconds. Every log contributes
//! `(end - start) / 1000` rounded down, with running logs measured up to the
//! store's clock.

use crate::db::db::Db;
use crate::db::error::{DbError, DbResult};
use crate::db::projects::{Project, SELECT_PROJECT};
use crate::libs::clock::local_day_bounds;
use chrono::{DateTime, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const SELECT_LOG: &str = "SELECT id, project_id, start_time, end_time FROM time_logs WHERE id = ?1";
const SELECT_PROJECT_LOGS: &str = "SELECT id, project_id, start_time, end_time FROM time_logs
    WHERE project_id = ?1
    ORDER BY start_time DESC, id DESC";
const SELECT_ACTIVE_LOG: &str = "SELECT id, project_id, start_time, end_time FROM time_logs
    WHERE project_id = ?1 AND end_time IS NULL
    ORDER BY start_time DESC, id DESC
    LIMIT 1";
const SELECT_ACTIVE_LOGS: &str = "SELECT id, project_id, start_time, end_time FROM time_logs
    WHERE end_time IS NULL
    ORDER BY start_time ASC, id ASC";
const INSERT_START: &str = "INSERT INTO time_logs (project_id, start_time) VALUES (?1, ?2)";
const INSERT_LOG: &str = "INSERT INTO time_logs (project_id, start_time, end_time) VALUES (?1, ?2, ?3)";
const UPDATE_END: &str = "UPDATE time_logs SET end_time = ?2 WHERE id = ?1 AND end_time IS NULL";
const DELETE_LOG: &str = "DELETE FROM time_logs WHERE id = ?1";

/// Seconds per log, open logs measured up to `?1`. Negative spans count as 0.
const ELAPSED_SECONDS: &str = "MAX(COALESCE(end_time, ?1) - start_time, 0) / 1000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLog {
    pub id: i64,
    pub project_id: i64,
    pub start_time: i64,
    pub end_time: Option<i64>,
}

impl TimeLog {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TimeLog {
            id: row.get(0)?,
            project_id: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
        })
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Whole seconds covered by this log, open logs measured up to `now`.
    pub fn elapsed_seconds(&self, now: i64) -> i64 {
        (self.end_time.unwrap_or(now) - self.start_time).max(0) / 1000
    }
}

/// A fully specified, already closed log for manual entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeLog {
    pub project_id: i64,
    pub start_time: i64,
    pub end_time: i64,
}

/// Total tracked seconds of one project on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTime {
    pub project_id: i64,
    pub seconds: i64,
}

fn active_log(conn: &Connection, project_id: i64) -> rusqlite::Result<Option<TimeLog>> {
    conn.query_row(SELECT_ACTIVE_LOG, params![project_id], TimeLog::from_row).optional()
}

impl Db {
    /// Opens a tracking session for a project and returns the new log id.
    ///
    /// Fails with [`DbError::ArchivedProject`] for archived projects and with
    /// [`DbError::AlreadyTracking`] when a session is already running. An
    /// unknown project id is rejected by the foreign key.
    pub async fn start_tracking(&self, project_id: i64) -> DbResult<i64> {
        let now = self.now();
        self.call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let project = tx.query_row(SELECT_PROJECT, params![project_id], Project::from_row).optional()?;
            if project.is_some_and(|p| p.archived) {
                return Err(DbError::ArchivedProject(project_id));
            }
            if let Some(log) = active_log(&tx, project_id)? {
                return Err(DbError::AlreadyTracking { project_id, log_id: log.id });
            }

            tx.execute(INSERT_START, params![project_id, now])?;
            let log_id = tx.last_insert_rowid();
            tx.commit()?;

            info!(project_id, log_id, start_time = now, "tracking started");
            Ok(log_id)
        })
        .await
    }

    /// Closes a running log at "now". Missing or closed logs are left as is.
    pub async fn stop_tracking(&self, log_id: i64) -> DbResult<()> {
        let now = self.now();
        self.call(move |conn| {
            let affected = conn.execute(UPDATE_END, params![log_id, now])?;
            if affected > 0 {
                info!(log_id, end_time = now, "tracking stopped");
            } else {
                debug!(log_id, "no running log to stop");
            }
            Ok(())
        })
        .await
    }

    /// Inserts a closed log, e.g. for manual entry, and returns the stored row.
    ///
    /// Rejects an end before the start, and timestamps outside chrono's
    /// date range, with [`DbError::InvalidTimeRange`].
    pub async fn create_time_log(&self, log: NewTimeLog) -> DbResult<TimeLog> {
        let representable = |millis: i64| DateTime::from_timestamp_millis(millis).is_some();
        if log.end_time < log.start_time || !representable(log.start_time) || !representable(log.end_time) {
            return Err(DbError::InvalidTimeRange {
                start_time: log.start_time,
                end_time: log.end_time,
            });
        }
        self.call(move |conn| {
            conn.execute(INSERT_LOG, params![log.project_id, log.start_time, log.end_time])?;
            let id = conn.last_insert_rowid();
            let created = conn.query_row(SELECT_LOG, params![id], TimeLog::from_row)?;
            debug!(id, project_id = log.project_id, "time log created");
            Ok(created)
        })
        .await
    }

    pub async fn delete_time_log(&self, id: i64) -> DbResult<()> {
        self.call(move |conn| {
            let affected = conn.execute(DELETE_LOG, params![id])?;
            debug!(id, affected, "time log deleted");
            Ok(())
        })
        .await
    }

    pub async fn get_time_log(&self, id: i64) -> DbResult<Option<TimeLog>> {
        self.call(move |conn| Ok(conn.query_row(SELECT_LOG, params![id], TimeLog::from_row).optional()?))
            .await
    }

    /// All logs of a project, newest start first.
    pub async fn get_project_logs(&self, project_id: i64) -> DbResult<Vec<TimeLog>> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(SELECT_PROJECT_LOGS)?;
            let logs = stmt
                .query_map(params![project_id], TimeLog::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(logs)
        })
        .await
    }

    /// The running log of a project, if any.
    pub async fn get_active_log(&self, project_id: i64) -> DbResult<Option<TimeLog>> {
        self.call(move |conn| Ok(active_log(conn, project_id)?)).await
    }

    /// Every running log across all projects, oldest first.
    pub async fn get_active_logs(&self) -> DbResult<Vec<TimeLog>> {
        self.call(|conn| {
            let mut stmt = conn.prepare(SELECT_ACTIVE_LOGS)?;
            let logs = stmt.query_map([], TimeLog::from_row)?.collect::<Result<Vec<_>, _>>()?;
            Ok(logs)
        })
        .await
    }

    pub async fn has_open_time_log(&self, project_id: i64) -> DbResult<bool> {
        Ok(self.get_active_log(project_id).await?.is_some())
    }

    /// Total seconds tracked for a project, running session included.
    pub async fn get_project_elapsed_time(&self, project_id: i64) -> DbResult<i64> {
        let now = self.now();
        self.call(move |conn| {
            let sql = format!("SELECT COALESCE(SUM({ELAPSED_SECONDS}), 0) FROM time_logs WHERE project_id = ?2");
            Ok(conn.query_row(&sql, params![now, project_id], |row| row.get(0))?)
        })
        .await
    }

    /// Seconds tracked for a project in logs that started on `date` (local time).
    pub async fn get_project_time_for_date(&self, project_id: i64, date: NaiveDate) -> DbResult<i64> {
        let now = self.now();
        let (day_start, day_end) = local_day_bounds(date);
        self.call(move |conn| {
            let sql = format!(
                "SELECT COALESCE(SUM({ELAPSED_SECONDS}), 0) FROM time_logs
                 WHERE project_id = ?2 AND start_time BETWEEN ?3 AND ?4"
            );
            Ok(conn.query_row(&sql, params![now, project_id, day_start, day_end], |row| row.get(0))?)
        })
        .await
    }

    /// Per-project totals for logs that started on `date` (local time),
    /// one row for every project with such a log, by project id.
    pub async fn get_project_times_for_date(&self, date: NaiveDate) -> DbResult<Vec<ProjectTime>> {
        let now = self.now();
        let (day_start, day_end) = local_day_bounds(date);
        self.call(move |conn| {
            let sql = format!(
                "SELECT project_id, COALESCE(SUM({ELAPSED_SECONDS}), 0) FROM time_logs
                 WHERE start_time BETWEEN ?2 AND ?3
                 GROUP BY project_id
                 ORDER BY project_id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let times = stmt
                .query_map(params![now, day_start, day_end], |row| {
                    Ok(ProjectTime {
                        project_id: row.get(0)?,
                        seconds: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(times)
        })
        .await
    }
}
