//! Wording of every [`Message`].
//!
//! All user-facing text is defined here so commands only pick a variant and
//! hand over the values; the macros in `macros.rs` add the status prefix.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            // === DATABASE MESSAGES ===
            Message::DatabaseReady(location, version) => format!("Database ready at {} (schema v{})", location, version),
            Message::MigrationsApplied(count, version) => format!("Applied {} migration(s), schema is now v{}", count, version),
            Message::DatabaseVersion(version) => format!("Database schema version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate(latest) => format!("Database schema needs migration to v{}", latest),
            Message::DatabaseLocation(location) => format!("Database file: {}", location),
            Message::ConfirmReset => "Delete ALL projects and time logs? This cannot be undone".to_string(),
            Message::ResetCompleted => "All projects and time logs deleted".to_string(),
            Message::ResetCancelled => "Reset cancelled".to_string(),

            // === PROJECT MESSAGES ===
            Message::ProjectAdded(id, name) => format!("Project '{}' added with id {}", name, id),
            Message::ProjectRenamed(old, new) => format!("Project '{}' renamed to '{}'", old, new),
            Message::ProjectArchived(name) => format!("Project '{}' archived", name),
            Message::ProjectArchivedStopped(name) => format!("Project '{}' archived, its running timer was stopped", name),
            Message::ProjectUnarchived(name) => format!("Project '{}' restored from the archive", name),
            Message::ProjectDeleted(name) => format!("Project '{}' and its time logs deleted", name),
            Message::ConfirmDeleteProject(name) => format!("Delete project '{}' and all of its time logs?", name),
            Message::ProjectNotFound(project) => format!("Project '{}' not found", project),
            Message::ProjectSelected(name) => format!("Project '{}' selected", name),
            Message::ProjectSelectionCleared => "No project selected anymore".to_string(),
            Message::NoProjects => "No projects yet. Add one with `tempus project add <name>`".to_string(),
            Message::NoProjectSelected => "No project given and none selected. Use `tempus project select <project>`".to_string(),

            // === TRACKING MESSAGES ===
            Message::TrackingStarted(name) => format!("Tracking '{}'", name),
            Message::TrackingStopped(name, duration) => format!("Stopped '{}' after {}", name, duration),
            Message::NotTracking(name) => format!("'{}' is not being tracked", name),
            Message::AlreadyTracking(name) => format!("'{}' is already being tracked", name),
            Message::CannotTrackArchived(name) => format!("Cannot track archived project '{}'", name),
            Message::StatusHeader => "Running timers:".to_string(),
            Message::StatusIdle => "No timer is running".to_string(),
            Message::StatusRunning(name, since, elapsed) => format!("  {} since {} ({})", name, since, elapsed),

            // === TIME LOG MESSAGES ===
            Message::TimeLogAdded(id, name) => format!("Time log {} added to '{}'", id, name),
            Message::TimeLogDeleted(id) => format!("Time log {} deleted", id),
            Message::TimeLogNotFound(id) => format!("Time log {} not found", id),
            Message::NoTimeLogs(name) => format!("No time logs for '{}'", name),
            Message::ProjectTotal(name, total) => format!("Total for '{}': {}", name, total),
            Message::NothingTrackedOn(date) => format!("Nothing tracked on {}", date),
            Message::DayHeader(date) => format!("Time tracked on {}", date),

            // === PREFERENCES MESSAGES ===
            Message::ThemeCurrent(theme) => format!("Theme: {}", theme),
            Message::ThemeSet(theme) => format!("Theme set to {}", theme),
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_interpolate_their_values() {
        assert_eq!(Message::ProjectAdded(3, "Website".into()).to_string(), "Project 'Website' added with id 3");
        assert_eq!(
            Message::TrackingStopped("Website".into(), "00:25:00".into()).to_string(),
            "Stopped 'Website' after 00:25:00"
        );
        assert_eq!(Message::CannotTrackArchived("Old".into()).to_string(), "Cannot track archived project 'Old'");
    }
}
