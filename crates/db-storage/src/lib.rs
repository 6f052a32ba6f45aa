// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the database ORM and database migrations for the event scheduler
//! Builds upon evsched-database
//!
//! Every table gets its own module which contains the typed ids, the queryable model and the
//! insert/update types together with the functions that run the queries.

#[macro_use]
extern crate diesel;

// postgres functions
use diesel::sql_types::Text;

#[macro_use]
mod macros;
mod schema;

pub mod attendances;
pub mod events;
pub mod invitations;
pub mod migrations;
pub mod notifications;
pub mod users;

sql_function!(fn lower(x: Text) -> Text);

// SQL types reexport for schema.rs
pub mod sql_types {
    pub use super::attendances::AttendanceRoleType as Attendance_role;
    pub use super::attendances::AttendanceStatusType as Attendance_status;
    pub use super::invitations::InvitationStatusType as Invitation_status;
    pub use super::notifications::NotificationKindType as Notification_kind;
    pub use diesel::sql_types::*;
}
