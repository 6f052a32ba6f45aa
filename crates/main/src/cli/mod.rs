// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use database::Db;
use scheduler::settings::Settings;
use scheduler::storage::PgStorage;
use scheduler::Scheduler;
use std::path::PathBuf;
use std::sync::Arc;

mod events;
mod notifications;
mod users;

#[derive(Parser, Debug, Clone)]
#[command(name = "evsched", about = "Operator tool of the event scheduler", version)]
pub struct Args {
    #[arg(
        short,
        long,
        default_value = "config.toml",
        help = "Specify path to configuration file"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    cmd: SubCommand,
}

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
enum SubCommand {
    /// Migrate the db. This is done automatically before every other command,
    /// but can be done on its own using this command.
    MigrateDb,
    /// Manage users
    #[command(subcommand)]
    Users(users::Command),
    /// Inspect the events of a user
    #[command(subcommand)]
    Events(events::Command),
    /// Inspect and acknowledge the notifications of a user
    #[command(subcommand)]
    Notifications(notifications::Command),
}

/// Parses the CLI-Arguments into [`Args`]
pub fn parse_args() -> Args {
    Args::parse()
}

pub async fn run(args: Args) -> Result<()> {
    let settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;

    scheduler::trace::init(&settings.logging)?;

    let report = db_storage::migrations::migrate_from_url(&settings.database.url)
        .await
        .context("Failed to migrate database")?;

    match args.cmd {
        SubCommand::MigrateDb => {
            println!(
                "Applied {} migration(s)",
                report.applied_migrations().len()
            );
            Ok(())
        }
        SubCommand::Users(command) => users::handle_command(&connect(&settings)?, command),
        SubCommand::Events(command) => events::handle_command(&connect(&settings)?, command),
        SubCommand::Notifications(command) => {
            notifications::handle_command(&connect(&settings)?, command)
        }
    }
}

fn connect(settings: &Settings) -> Result<Scheduler<PgStorage>> {
    let db = Db::connect_url(
        &settings.database.url,
        settings.database.max_connections,
        Some(settings.database.min_idle_connections),
    )
    .context("Failed to connect to database")?;

    Ok(Scheduler::new(Arc::new(PgStorage::new(Arc::new(db)))))
}
