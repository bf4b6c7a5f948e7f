use super::Context;
use crate::{libs::messages::Message, msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(ctx: &Context, args: ResetArgs) -> Result<()> {
    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmReset.to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::ResetCancelled);
            return Ok(());
        }
    }

    ctx.db.reset_database().await?;
    ctx.session.clear()?;
    ctx.session.set_tracking(None);
    msg_success!(Message::ResetCompleted);
    Ok(())
}
