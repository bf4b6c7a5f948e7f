use crate::libs::config::{Config, CONFIG_FILE_NAME};
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remember this database file for later runs
    #[arg(long)]
    db_path: Option<PathBuf>,
}

pub async fn cmd(args: InitArgs, db_override: Option<&Path>) -> Result<()> {
    let mut config = Config::read()?;

    if let Some(path) = args.db_path {
        config.db_path = Some(path);
        config.save()?;
        let saved_to = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        msg_success!(Message::ConfigSaved(saved_to.display().to_string()));
    }

    let db = config.db(db_override)?;
    let applied = db.initialize().await?;
    let version = db.schema_version().await?;

    if applied > 0 {
        msg_info!(Message::MigrationsApplied(applied, version));
    }
    msg_success!(Message::DatabaseReady(db.location().to_string(), version));
    Ok(())
}
