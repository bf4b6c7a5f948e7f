use super::Context;
use crate::{
    db::time_logs::NewTimeLog,
    libs::{formatter::parse_datetime, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct LogArgs {
    #[command(subcommand)]
    command: LogCommand,
}

#[derive(Debug, Subcommand)]
enum LogCommand {
    /// Add a finished time log
    Add {
        /// Project name or ID
        project: String,
        /// Start, local time "YYYY-MM-DD HH:MM[:SS]"
        #[arg(short, long)]
        start: String,
        /// End, local time "YYYY-MM-DD HH:MM[:SS]"
        #[arg(short, long)]
        end: String,
    },
    /// Delete a time log by ID
    Delete {
        /// Time log ID
        id: i64,
    },
}

pub async fn cmd(ctx: &Context, args: LogArgs) -> Result<()> {
    match args.command {
        LogCommand::Add { project, start, end } => {
            let project = ctx.resolve_project(Some(&project)).await?;
            let log = ctx
                .db
                .create_time_log(NewTimeLog {
                    project_id: project.id,
                    start_time: parse_datetime(&start)?,
                    end_time: parse_datetime(&end)?,
                })
                .await?;
            msg_success!(Message::TimeLogAdded(log.id, project.name));
        }
        LogCommand::Delete { id } => {
            if ctx.db.get_time_log(id).await?.is_none() {
                msg_error!(Message::TimeLogNotFound(id));
                return Ok(());
            }
            ctx.db.delete_time_log(id).await?;
            if ctx.session.active_log_id() == Some(id) {
                ctx.session.set_tracking(None);
            }
            msg_success!(Message::TimeLogDeleted(id));
        }
    }
    Ok(())
}
