use super::Context;
use crate::{
    db::error::DbError,
    libs::{
        formatter::{format_seconds, format_timestamp},
        messages::Message,
    },
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Project name or ID (defaults to the selected project)
    project: Option<String>,
}

pub async fn start(ctx: &Context, args: TrackArgs) -> Result<()> {
    let project = ctx.resolve_project(args.project.as_deref()).await?;

    match ctx.session.start(&ctx.db, project.id).await {
        Ok(_) => {
            ctx.session.set_active_project(Some(project.id))?;
            msg_success!(Message::TrackingStarted(project.name));
        }
        Err(DbError::ArchivedProject(_)) => msg_error!(Message::CannotTrackArchived(project.name)),
        Err(DbError::AlreadyTracking { .. }) => msg_warning!(Message::AlreadyTracking(project.name)),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub async fn stop(ctx: &Context, args: TrackArgs) -> Result<()> {
    let project = ctx.resolve_project(args.project.as_deref()).await?;

    let Some(log) = ctx.db.get_active_log(project.id).await? else {
        msg_info!(Message::NotTracking(project.name));
        return Ok(());
    };

    ctx.db.stop_tracking(log.id).await?;
    if ctx.session.active_log_id() == Some(log.id) {
        ctx.session.set_tracking(None);
    }

    let duration = ctx.db.get_time_log(log.id).await?.map(|log| log.elapsed_seconds(ctx.db.now())).unwrap_or(0);
    msg_success!(Message::TrackingStopped(project.name, format_seconds(duration)));
    Ok(())
}

pub async fn status(ctx: &Context) -> Result<()> {
    let running = ctx.db.get_active_logs().await?;
    if running.is_empty() {
        msg_info!(Message::StatusIdle);
        return Ok(());
    }

    let now = ctx.db.now();
    msg_print!(Message::StatusHeader);
    for log in running {
        let name = match ctx.db.get_project(log.project_id).await? {
            Some(project) => project.name,
            None => log.project_id.to_string(),
        };
        msg_print!(Message::StatusRunning(
            name,
            format_timestamp(log.start_time),
            format_seconds(log.elapsed_seconds(now))
        ));
    }
    Ok(())
}
