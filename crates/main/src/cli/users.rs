// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use db_storage::users::{User, UserId};
use scheduler::storage::Storage;
use scheduler::users::NewUserRequest;
use scheduler::Scheduler;
use tabled::{Style, Table, Tabled};

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// Register a new user
    Create {
        /// Email address, must not be in use by another user
        email: String,
        firstname: String,
        lastname: String,
    },
    /// List all users
    List,
}

pub fn handle_command<S: Storage>(scheduler: &Scheduler<S>, command: Command) -> Result<()> {
    match command {
        Command::Create {
            email,
            firstname,
            lastname,
        } => create_user(
            scheduler,
            NewUserRequest {
                email,
                firstname,
                lastname,
            },
        ),
        Command::List => list_all_users(scheduler),
    }
}

#[derive(Tabled)]
struct UserTableRow {
    id: UserId,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl UserTableRow {
    fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            name: user.display_name(),
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Implementation of the `evsched users create <email> <firstname> <lastname>` command
fn create_user<S: Storage>(scheduler: &Scheduler<S>, request: NewUserRequest) -> Result<()> {
    let user = scheduler.users.create_user(request)?;

    println!(
        "Created user\n\tid    = {}\n\temail = {}\n\tname  = {}",
        user.id,
        user.email,
        user.display_name()
    );

    Ok(())
}

/// Implementation of the `evsched users list` command
fn list_all_users<S: Storage>(scheduler: &Scheduler<S>) -> Result<()> {
    let rows: Vec<UserTableRow> = scheduler
        .users
        .list_users()?
        .into_iter()
        .map(UserTableRow::from_user)
        .collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}
