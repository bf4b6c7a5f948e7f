//! The store handle.
//!
//! [`Db`] is constructed once at startup and passed to every data access call.
//! It starts out unopened; [`Db::initialize`] opens the SQLite file, turns on
//! foreign key enforcement and brings the schema up to date. Until then every
//! operation fails with [`DbError::Uninitialized`].
//!
//! All operations are `async`: the rusqlite call runs on tokio's blocking pool
//! while the caller is suspended. The connection lives behind a
//! `parking_lot::Mutex`, so calls on clones of the same handle are serialized.

use crate::db::error::{DbError, DbResult};
use crate::db::migrations::MigrationManager;
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::data_storage::DataStorage;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const DB_FILE_NAME: &str = "projects.db";

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl fmt::Display for DbLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbLocation::File(path) => write!(f, "{}", path.display()),
            DbLocation::Memory => write!(f, ":memory:"),
        }
    }
}

#[derive(Clone)]
pub struct Db {
    location: DbLocation,
    conn: Arc<Mutex<Option<Connection>>>,
    clock: Arc<dyn Clock>,
    migrations: Arc<MigrationManager>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("location", &self.location)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Db {
    /// Handle for `projects.db` in the platform data directory.
    pub fn new() -> DbResult<Db> {
        let path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Ok(Self::open(path))
    }

    /// Handle for a database file at `path`. Nothing is opened yet.
    pub fn open(path: impl Into<PathBuf>) -> Db {
        Self::with_location(DbLocation::File(path.into()))
    }

    /// Handle for a private in-memory database, one per handle.
    pub fn in_memory() -> Db {
        Self::with_location(DbLocation::Memory)
    }

    fn with_location(location: DbLocation) -> Db {
        Db {
            location,
            conn: Arc::new(Mutex::new(None)),
            clock: Arc::new(SystemClock),
            migrations: Arc::new(MigrationManager::new()),
        }
    }

    /// Replaces the time source used for every "now" the store writes.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Db {
        self.clock = clock;
        self
    }

    /// Replaces the migration list applied by [`Db::initialize`].
    pub fn with_migrations(mut self, migrations: MigrationManager) -> Db {
        self.migrations = Arc::new(migrations);
        self
    }

    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.lock().is_some()
    }

    /// Current time in epoch milliseconds, as seen by the store.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Opens the database (once) and applies pending migrations.
    ///
    /// Returns the number of migration steps applied. Calling it again on an
    /// initialized handle re-checks the schema and normally applies nothing.
    pub async fn initialize(&self) -> DbResult<usize> {
        let slot = Arc::clone(&self.conn);
        let location = self.location.clone();
        let migrations = Arc::clone(&self.migrations);

        tokio::task::spawn_blocking(move || {
            let mut guard = slot.lock();
            if guard.is_none() {
                let conn = open_connection(&location)?;
                info!(location = %location, "database opened");
                *guard = Some(conn);
            }
            let conn = guard.as_mut().ok_or(DbError::Uninitialized)?;
            migrations.run_migrations(conn)
        })
        .await?
    }

    /// Drops the connection; later calls fail with `Uninitialized` until the
    /// handle is initialized again.
    pub fn close(&self) {
        if self.conn.lock().take().is_some() {
            debug!(location = %self.location, "database closed");
        }
    }

    /// Current schema version of the opened database.
    pub async fn schema_version(&self) -> DbResult<u32> {
        self.call(|conn| Ok(crate::db::migrations::get_db_version(conn))).await
    }

    /// Runs `f` against the open connection on the blocking pool.
    pub(crate) async fn call<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let slot = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = slot.lock();
            let conn = guard.as_mut().ok_or(DbError::Uninitialized)?;
            f(conn)
        })
        .await?
    }
}

fn open_connection(location: &DbLocation) -> DbResult<Connection> {
    let conn = match location {
        DbLocation::File(path) => {
            ensure_parent_dir(path)?;
            Connection::open(path)?
        }
        DbLocation::Memory => Connection::open_in_memory()?,
    };
    // Cascading deletes of time logs depend on this
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
