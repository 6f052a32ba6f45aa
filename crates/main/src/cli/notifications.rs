// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use db_storage::notifications::{Notification, NotificationKind};
use scheduler::storage::Storage;
use scheduler::Scheduler;
use tabled::{Style, Table, Tabled};

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// List the notifications of a user, newest first
    List {
        /// Email address of the recipient
        email: String,
    },
    /// Mark all notifications of a user as read
    ReadAll {
        /// Email address of the recipient
        email: String,
    },
}

pub fn handle_command<S: Storage>(scheduler: &Scheduler<S>, command: Command) -> Result<()> {
    match command {
        Command::List { email } => list_notifications(scheduler, &email),
        Command::ReadAll { email } => read_all(scheduler, &email),
    }
}

#[derive(Tabled)]
struct NotificationTableRow {
    created_at: DateTime<Utc>,
    kind: NotificationKind,
    read: bool,
    message: String,
}

impl NotificationTableRow {
    fn from_notification(notification: Notification) -> Self {
        Self {
            created_at: notification.created_at,
            kind: notification.kind,
            read: notification.is_read,
            message: notification.message,
        }
    }
}

/// Implementation of the `evsched notifications list <email>` command
fn list_notifications<S: Storage>(scheduler: &Scheduler<S>, email: &str) -> Result<()> {
    let user = scheduler.users.get_user_by_email(email)?;

    let rows: Vec<NotificationTableRow> = scheduler
        .notifications
        .notifications_for(user.id)?
        .into_iter()
        .map(NotificationTableRow::from_notification)
        .collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}

/// Implementation of the `evsched notifications read-all <email>` command
fn read_all<S: Storage>(scheduler: &Scheduler<S>, email: &str) -> Result<()> {
    let user = scheduler.users.get_user_by_email(email)?;
    let changed = scheduler.notifications.mark_all_as_read(user.id)?;

    println!("Marked {changed} notification(s) of {} as read", user.email);

    Ok(())
}
