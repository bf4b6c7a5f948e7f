pub mod init;
pub mod log;
pub mod migrations;
pub mod project;
pub mod reset;
pub mod sum;
pub mod theme;
pub mod track;

use crate::db::db::Db;
use crate::db::projects::Project;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::preferences::{JsonPreferences, PreferenceStore};
use crate::libs::session::TrackingSession;
use crate::msg_bail_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create the database and optionally store its location")]
    Init(init::InitArgs),
    #[command(about = "Manage projects")]
    Project(project::ProjectArgs),
    #[command(about = "Start tracking a project (the selected one by default)")]
    Start(track::TrackArgs),
    #[command(about = "Stop tracking a project (the selected one by default)")]
    Stop(track::TrackArgs),
    #[command(about = "Show running timers")]
    Status,
    #[command(about = "Add or delete time logs by hand")]
    Log(log::LogArgs),
    #[command(about = "Sum tracked time per project or per day")]
    Sum(sum::SumArgs),
    #[command(about = "Show or set the theme preference")]
    Theme(theme::ThemeArgs),
    #[command(about = "Delete all projects and time logs")]
    Reset(reset::ResetArgs),
    #[command(about = "Inspect the database schema version")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Database file to use instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let db_override = cli.db.as_deref();

        match cli.command {
            Commands::Init(args) => init::cmd(args, db_override).await,
            Commands::Migrations(args) => migrations::cmd(args, db_override),
            Commands::Theme(args) => theme::cmd(args),
            Commands::Project(args) => project::cmd(&Context::open(db_override).await?, args).await,
            Commands::Start(args) => track::start(&Context::open(db_override).await?, args).await,
            Commands::Stop(args) => track::stop(&Context::open(db_override).await?, args).await,
            Commands::Status => track::status(&Context::open(db_override).await?).await,
            Commands::Log(args) => log::cmd(&Context::open(db_override).await?, args).await,
            Commands::Sum(args) => sum::cmd(&Context::open(db_override).await?, args).await,
            Commands::Reset(args) => reset::cmd(&Context::open(db_override).await?, args).await,
        }
    }
}

/// What every data command needs: an initialized store and the view state.
pub struct Context {
    pub db: Db,
    pub session: TrackingSession,
}

impl Context {
    pub async fn open(db_override: Option<&Path>) -> Result<Context> {
        let db = Config::read()?.db(db_override)?;
        db.initialize().await?;

        let prefs: Arc<dyn PreferenceStore> = Arc::new(JsonPreferences::new()?);
        Self::with_parts(db, prefs).await
    }

    /// Context over an already initialized store.
    pub async fn with_parts(db: Db, prefs: Arc<dyn PreferenceStore>) -> Result<Context> {
        let session = TrackingSession::new(prefs);
        session.sync(&db).await?;
        Ok(Context { db, session })
    }

    /// Finds a project by id or (case-insensitive) name, falling back to the
    /// selected project when `project` is `None`.
    pub async fn resolve_project(&self, project: Option<&str>) -> Result<Project> {
        let Some(project) = project else {
            let Some(id) = self.session.active_project_id() else {
                msg_bail_anyhow!(Message::NoProjectSelected);
            };
            return match self.db.get_project(id).await? {
                Some(found) => Ok(found),
                None => msg_bail_anyhow!(Message::ProjectNotFound(id.to_string())),
            };
        };

        if let Ok(id) = project.trim().parse::<i64>() {
            if let Some(found) = self.db.get_project(id).await? {
                return Ok(found);
            }
        }

        let found = self
            .db
            .get_projects(true)
            .await?
            .into_iter()
            .find(|candidate| candidate.name.eq_ignore_ascii_case(project.trim()));
        match found {
            Some(found) => Ok(found),
            None => msg_bail_anyhow!(Message::ProjectNotFound(project.to_string())),
        }
    }
}
