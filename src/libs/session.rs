//! Observable tracking state for front ends.
//!
//! [`TrackingSession`] holds what a view needs to render the tracker: the
//! selected project, whether a timer runs, and the running log. Each value is
//! a `tokio::sync::watch` channel, so any number of views can subscribe and
//! wake up on change. Only the selected project is persisted, through the
//! [`PreferenceStore`] it was built with.

use super::preferences::{PreferenceStore, ACTIVE_PROJECT_KEY};
use crate::db::db::Db;
use crate::db::error::DbResult;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub struct TrackingSession {
    store: Arc<dyn PreferenceStore>,
    active_project_id: watch::Sender<Option<i64>>,
    is_tracking: watch::Sender<bool>,
    active_log_id: watch::Sender<Option<i64>>,
}

impl TrackingSession {
    /// Restores the selected project from `store`. Unparsable or
    /// non-positive values read as no selection.
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let initial = store
            .get(ACTIVE_PROJECT_KEY)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|id| *id > 0);

        Self {
            store,
            active_project_id: watch::Sender::new(initial),
            is_tracking: watch::Sender::new(false),
            active_log_id: watch::Sender::new(None),
        }
    }

    pub fn active_project_id(&self) -> Option<i64> {
        *self.active_project_id.borrow()
    }

    pub fn is_tracking(&self) -> bool {
        *self.is_tracking.borrow()
    }

    pub fn active_log_id(&self) -> Option<i64> {
        *self.active_log_id.borrow()
    }

    pub fn subscribe_active_project(&self) -> watch::Receiver<Option<i64>> {
        self.active_project_id.subscribe()
    }

    pub fn subscribe_tracking(&self) -> watch::Receiver<bool> {
        self.is_tracking.subscribe()
    }

    pub fn subscribe_active_log(&self) -> watch::Receiver<Option<i64>> {
        self.active_log_id.subscribe()
    }

    /// Selects a project and mirrors it to the preference store. `None` and
    /// `Some(0)` both clear the selection.
    pub fn set_active_project(&self, id: Option<i64>) -> Result<()> {
        let id = id.filter(|id| *id != 0);
        match id {
            Some(id) => self.store.set(ACTIVE_PROJECT_KEY, &id.to_string())?,
            None => self.store.remove(ACTIVE_PROJECT_KEY)?,
        }
        self.active_project_id.send_replace(id);
        debug!(?id, "active project changed");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.set_active_project(None)
    }

    /// Records a running log, or no running log with `None`.
    pub fn set_tracking(&self, log_id: Option<i64>) {
        self.active_log_id.send_replace(log_id);
        self.is_tracking.send_replace(log_id.is_some());
    }

    /// Reloads the tracking flags from the running log of the selected
    /// project. A selection that no longer exists in the store is cleared.
    pub async fn sync(&self, db: &Db) -> Result<()> {
        let Some(project_id) = self.active_project_id() else {
            self.set_tracking(None);
            return Ok(());
        };

        if db.get_project(project_id).await?.is_none() {
            debug!(project_id, "selected project no longer exists");
            self.clear()?;
            self.set_tracking(None);
            return Ok(());
        }

        let log = db.get_active_log(project_id).await?;
        self.set_tracking(log.map(|log| log.id));
        Ok(())
    }

    /// Starts tracking the selected project and records the new log.
    pub async fn start(&self, db: &Db, project_id: i64) -> DbResult<i64> {
        let log_id = db.start_tracking(project_id).await?;
        self.set_tracking(Some(log_id));
        Ok(log_id)
    }

    /// Stops the running log, if any.
    pub async fn stop(&self, db: &Db) -> DbResult<Option<i64>> {
        let Some(log_id) = self.active_log_id() else {
            return Ok(None);
        };
        db.stop_tracking(log_id).await?;
        self.set_tracking(None);
        Ok(Some(log_id))
    }
}
