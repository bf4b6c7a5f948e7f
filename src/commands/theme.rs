use crate::{
    libs::{
        messages::Message,
        preferences::{JsonPreferences, Theme},
    },
    msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ThemeArgs {
    /// New theme; omit to show the current one
    #[arg(value_enum)]
    theme: Option<Theme>,
}

pub fn cmd(args: ThemeArgs) -> Result<()> {
    let prefs = JsonPreferences::new()?;

    match args.theme {
        Some(theme) => {
            theme.save(&prefs)?;
            msg_success!(Message::ThemeSet(theme.to_string()));
        }
        None => msg_print!(Message::ThemeCurrent(Theme::load(&prefs).to_string())),
    }
    Ok(())
}
