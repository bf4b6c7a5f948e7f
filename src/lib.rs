//! # Tempus - project time tracking
//!
//! The persistence and query layer of a single-user time tracker: projects,
//! start/stop timers against them, and elapsed time per project and per day,
//! stored in one local SQLite file with an incrementally versioned schema.
//!
//! ## Features
//!
//! - **Schema Migrations**: ordered, versioned DDL steps applied exactly once
//! - **Projects**: add, rename, archive/unarchive, delete with cascading logs
//! - **Tracking**: one running timer per project, closed on stop or archive
//! - **Aggregates**: elapsed seconds per project, per project and day
//! - **Preferences**: selected project and theme kept outside the database
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
//!     let id = db.add_project("Thesis").await?;
//!     db.start_tracking(id).await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
