//! Database layer for the tempus application.
//!
//! A single SQLite file holds two tables, `projects` and `time_logs`, plus the
//! `schema_version` marker maintained by the migrator. Everything goes through
//! an explicit [`db::Db`] handle that is created at startup, initialized once,
//! and then shared by reference (or cheap clone) with whoever needs it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempus::db::db::Db;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Db::new()?;
//!     db.initialize().await?;
//!
//!     let project = db.add_project("Website").await?;
//!     let log = db.start_tracking(project).await?;
//!     db.stop_tracking(log).await?;
//!
//!     println!("{}s", db.get_project_elapsed_time(project).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Invariants
//!
//! - A project has at most one running time log (`end_time IS NULL`)
//! - Archived projects never have a running time log
//! - Deleting a project deletes its time logs (`ON DELETE CASCADE`)

/// Store handle: connection slot, location and clock.
pub mod db;

/// Error type of the data layer.
pub mod error;

/// Versioned schema migrations tracked in `schema_version`.
pub mod migrations;

/// Project CRUD and archival.
pub mod projects;

/// Tracking sessions, manual entries and elapsed time aggregates.
pub mod time_logs;
