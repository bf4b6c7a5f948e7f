/// Every user-facing text of the command-line front end.
///
/// Variants carry the values they interpolate; the wording lives in
/// `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === DATABASE MESSAGES ===
    DatabaseReady(String, u32), // location, version
    MigrationsApplied(usize, u32), // count, version
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate(u32), // latest version
    DatabaseLocation(String),
    ConfirmReset,
    ResetCompleted,
    ResetCancelled,

    // === PROJECT MESSAGES ===
    ProjectAdded(i64, String), // id, name
    ProjectRenamed(String, String), // old, new
    ProjectArchived(String),
    ProjectArchivedStopped(String), // name; a running session was closed
    ProjectUnarchived(String),
    ProjectDeleted(String),
    ConfirmDeleteProject(String),
    ProjectNotFound(String), // id or name as typed
    ProjectSelected(String),
    ProjectSelectionCleared,
    NoProjects,
    NoProjectSelected,

    // === TRACKING MESSAGES ===
    TrackingStarted(String), // project
    TrackingStopped(String, String), // project, session duration
    NotTracking(String),
    AlreadyTracking(String),
    CannotTrackArchived(String),
    StatusHeader,
    StatusIdle,
    StatusRunning(String, String, String), // project, since, elapsed

    // === TIME LOG MESSAGES ===
    TimeLogAdded(i64, String), // id, project
    TimeLogDeleted(i64),
    TimeLogNotFound(i64),
    NoTimeLogs(String),
    ProjectTotal(String, String), // project, total
    NothingTrackedOn(String),   // date
    DayHeader(String),          // date

    // === PREFERENCES MESSAGES ===
    ThemeCurrent(String),
    ThemeSet(String),
    ConfigSaved(String), // path
}
