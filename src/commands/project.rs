use super::Context;
use crate::{
    libs::{formatter::format_seconds, messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::collections::HashMap;

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Debug, Subcommand)]
enum ProjectCommand {
    /// Add a new project
    Add {
        /// Project name
        name: String,
        /// Select the new project right away
        #[arg(short, long)]
        select: bool,
    },
    /// List projects with their total time
    List {
        /// Include archived projects
        #[arg(short, long)]
        all: bool,
    },
    /// Rename a project
    Rename {
        /// Project name or ID
        project: String,
        /// New name
        name: String,
    },
    /// Archive a project, stopping its timer
    Archive {
        /// Project name or ID
        project: String,
    },
    /// Restore an archived project
    Unarchive {
        /// Project name or ID
        project: String,
    },
    /// Delete a project and all of its time logs
    Delete {
        /// Project name or ID
        project: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Select the project `start` and `stop` use by default
    Select {
        /// Project name or ID; omit to clear the selection
        project: Option<String>,
    },
    /// Show the time logs of a project
    Logs {
        /// Project name or ID (defaults to the selected project)
        project: Option<String>,
    },
}

pub async fn cmd(ctx: &Context, args: ProjectArgs) -> Result<()> {
    match args.command {
        ProjectCommand::Add { name, select } => handle_add(ctx, name, select).await,
        ProjectCommand::List { all } => handle_list(ctx, all).await,
        ProjectCommand::Rename { project, name } => handle_rename(ctx, project, name).await,
        ProjectCommand::Archive { project } => handle_archive(ctx, project).await,
        ProjectCommand::Unarchive { project } => handle_unarchive(ctx, project).await,
        ProjectCommand::Delete { project, yes } => handle_delete(ctx, project, yes).await,
        ProjectCommand::Select { project } => handle_select(ctx, project).await,
        ProjectCommand::Logs { project } => handle_logs(ctx, project).await,
    }
}

async fn handle_add(ctx: &Context, name: String, select: bool) -> Result<()> {
    let id = ctx.db.add_project(name.trim()).await?;
    msg_success!(Message::ProjectAdded(id, name.trim().to_string()));

    if select {
        ctx.session.set_active_project(Some(id))?;
        msg_info!(Message::ProjectSelected(name.trim().to_string()));
    }
    Ok(())
}

async fn handle_list(ctx: &Context, all: bool) -> Result<()> {
    let projects = ctx.db.get_projects(all).await?;
    if projects.is_empty() {
        msg_info!(Message::NoProjects);
        return Ok(());
    }

    let mut totals = HashMap::new();
    for project in &projects {
        totals.insert(project.id, ctx.db.get_project_elapsed_time(project.id).await?);
    }

    View::projects(&projects, &totals, ctx.session.active_project_id());
    Ok(())
}

async fn handle_rename(ctx: &Context, project: String, name: String) -> Result<()> {
    let project = ctx.resolve_project(Some(&project)).await?;
    ctx.db.rename_project(project.id, name.trim()).await?;
    msg_success!(Message::ProjectRenamed(project.name, name.trim().to_string()));
    Ok(())
}

async fn handle_archive(ctx: &Context, project: String) -> Result<()> {
    let project = ctx.resolve_project(Some(&project)).await?;
    let was_running = ctx.db.has_open_time_log(project.id).await?;

    ctx.db.archive_project(project.id).await?;
    if ctx.session.active_project_id() == Some(project.id) {
        ctx.session.set_tracking(None);
    }

    if was_running {
        msg_success!(Message::ProjectArchivedStopped(project.name));
    } else {
        msg_success!(Message::ProjectArchived(project.name));
    }
    Ok(())
}

async fn handle_unarchive(ctx: &Context, project: String) -> Result<()> {
    let project = ctx.resolve_project(Some(&project)).await?;
    ctx.db.unarchive_project(project.id).await?;
    msg_success!(Message::ProjectUnarchived(project.name));
    Ok(())
}

async fn handle_delete(ctx: &Context, project: String, yes: bool) -> Result<()> {
    let project = ctx.resolve_project(Some(&project)).await?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteProject(project.name.clone()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    ctx.db.delete_project(project.id).await?;
    if ctx.session.active_project_id() == Some(project.id) {
        ctx.session.clear()?;
    }
    msg_success!(Message::ProjectDeleted(project.name));
    Ok(())
}

async fn handle_select(ctx: &Context, project: Option<String>) -> Result<()> {
    let Some(project) = project else {
        ctx.session.clear()?;
        msg_info!(Message::ProjectSelectionCleared);
        return Ok(());
    };

    let project = ctx.resolve_project(Some(&project)).await?;
    ctx.session.set_active_project(Some(project.id))?;
    msg_success!(Message::ProjectSelected(project.name));
    Ok(())
}

async fn handle_logs(ctx: &Context, project: Option<String>) -> Result<()> {
    let project = ctx.resolve_project(project.as_deref()).await?;
    let logs = ctx.db.get_project_logs(project.id).await?;

    if logs.is_empty() {
        msg_info!(Message::NoTimeLogs(project.name));
        return Ok(());
    }

    View::logs(&logs, ctx.db.now());
    let total = ctx.db.get_project_elapsed_time(project.id).await?;
    msg_print!(Message::ProjectTotal(project.name, format_seconds(total)), true);
    Ok(())
}
