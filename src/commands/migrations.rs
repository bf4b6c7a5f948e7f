use crate::{
    db::migrations::{get_db_version, MigrationManager},
    libs::{config::Config, messages::Message},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show the current database version without migrating
    Status,
    /// List the known schema steps
    List,
}

pub fn cmd(args: MigrationsArgs, db_override: Option<&Path>) -> Result<()> {
    let manager = MigrationManager::new();

    match args.command {
        MigrationsCommand::Status => {
            let path = Config::read()?.db_path(db_override)?;
            msg_print!(Message::DatabaseLocation(path.display().to_string()));

            // Status never creates or migrates the file
            let version = if path.exists() {
                let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
                get_db_version(&conn)
            } else {
                0
            };

            msg_print!(Message::DatabaseVersion(version));
            if version < manager.latest_version() {
                msg_info!(Message::DatabaseNeedsUpdate(manager.latest_version()));
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::List => {
            for migration in manager.migrations() {
                println!("  v{}: {}", migration.version, migration.name);
            }
        }
    }

    Ok(())
}
