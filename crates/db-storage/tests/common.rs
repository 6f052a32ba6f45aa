// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::{Duration, Utc};
use database::DbConnection;
use evsched_db_storage::events::{Event, NewEvent};
use evsched_db_storage::users::{NewUser, User};

pub fn make_user(conn: &mut DbConnection, firstname: &str, lastname: &str) -> User {
    NewUser {
        email: format!(
            "{}.{}@example.org",
            firstname.to_lowercase(),
            lastname.to_lowercase()
        ),
        firstname: firstname.into(),
        lastname: lastname.into(),
    }
    .insert(conn)
    .unwrap()
}

pub fn make_event(conn: &mut DbConnection, title: &str, starts_in: Duration) -> Event {
    NewEvent {
        title: title.into(),
        description: "Test Event".into(),
        starts_at: Utc::now() + starts_in,
        location: "Test Location".into(),
    }
    .insert(conn)
    .unwrap()
}
