use super::Context;
use crate::{
    libs::{
        formatter::{format_seconds, parse_date},
        messages::Message,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SumArgs {
    /// Day to sum, "YYYY-MM-DD" or "today"
    #[arg(short, long, default_value = "today")]
    date: String,
    /// Only this project (name or ID); prints its day and all-time totals
    #[arg(short, long)]
    project: Option<String>,
}

pub async fn cmd(ctx: &Context, args: SumArgs) -> Result<()> {
    let date = parse_date(&args.date)?;

    if let Some(project) = args.project {
        let project = ctx.resolve_project(Some(&project)).await?;
        let day = ctx.db.get_project_time_for_date(project.id, date).await?;
        let total = ctx.db.get_project_elapsed_time(project.id).await?;

        msg_print!(Message::DayHeader(date.to_string()));
        View::day(&[(project.name.clone(), day)]);
        msg_print!(Message::ProjectTotal(project.name, format_seconds(total)), true);
        return Ok(());
    }

    let times = ctx.db.get_project_times_for_date(date).await?;
    if times.is_empty() {
        msg_info!(Message::NothingTrackedOn(date.to_string()));
        return Ok(());
    }

    let mut rows = Vec::with_capacity(times.len());
    for time in times {
        let name = match ctx.db.get_project(time.project_id).await? {
            Some(project) => project.name,
            None => time.project_id.to_string(),
        };
        rows.push((name, time.seconds));
    }

    msg_print!(Message::DayHeader(date.to_string()));
    View::day(&rows);
    Ok(())
}
