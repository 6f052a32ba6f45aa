// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use db_storage::attendances::AttendanceRole;
use db_storage::events::EventId;
use scheduler::events::EventWithRole;
use scheduler::storage::Storage;
use scheduler::Scheduler;
use tabled::{Style, Table, Tabled};

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// List the events a user is registered for or attended
    List {
        /// Email address of the user
        email: String,
        /// Only list events in which the user holds this role (organizer, attendee)
        #[clap(long)]
        role: Option<AttendanceRole>,
        /// UPCOMING or PAST
        #[clap(long, default_value = "UPCOMING")]
        timeframe: String,
        /// Also list cancelled events
        #[clap(long)]
        include_cancelled: bool,
    },
}

pub fn handle_command<S: Storage>(scheduler: &Scheduler<S>, command: Command) -> Result<()> {
    match command {
        Command::List {
            email,
            role,
            timeframe,
            include_cancelled,
        } => list_events(scheduler, &email, role, &timeframe, include_cancelled),
    }
}

#[derive(Tabled)]
struct EventTableRow {
    id: EventId,
    title: String,
    starts_at: DateTime<Utc>,
    location: String,
    role: AttendanceRole,
    cancelled: bool,
}

impl EventTableRow {
    fn from_event_with_role(entry: EventWithRole) -> Self {
        Self {
            id: entry.event.id,
            title: entry.event.title,
            starts_at: entry.event.starts_at,
            location: entry.event.location,
            role: entry.role,
            cancelled: entry.event.is_cancelled,
        }
    }
}

/// Implementation of the `evsched events list <email>` command
fn list_events<S: Storage>(
    scheduler: &Scheduler<S>,
    email: &str,
    role: Option<AttendanceRole>,
    timeframe: &str,
    include_cancelled: bool,
) -> Result<()> {
    let user = scheduler.users.get_user_by_email(email)?;

    let rows: Vec<EventTableRow> = scheduler
        .events
        .get_filtered_events_with_role(user.id, role, timeframe, include_cancelled)?
        .into_iter()
        .map(EventTableRow::from_event_with_role)
        .collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}
