// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Storage seam of the scheduler
//!
//! Every public scheduling operation runs inside exactly one [`Storage::transaction`]. The
//! closure receives a [`Repository`] which exposes the per-entity lookups and writes. If the
//! closure returns an error, none of its writes become visible.

use crate::Result;
use db_storage::attendances::{
    Attendance, AttendanceId, AttendanceStatus, NewAttendance, UpdateAttendance,
};
use db_storage::events::{Event, EventId, EventsForUserFilter, NewEvent, UpdateEvent};
use db_storage::invitations::{
    Invitation, InvitationFilter, InvitationId, InvitationStatus, NewInvitation,
};
use db_storage::notifications::{NewNotification, Notification, NotificationId};
use db_storage::users::{NewUser, UpdateUser, User, UserId};

mod postgres;

pub use postgres::PgStorage;

/// Executes closures transactionally against the durable store
pub trait Storage: Send + Sync {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T>;
}

/// Per-entity operations available inside a transaction
///
/// Inserts into tables with a uniqueness constraint return `Ok(None)` when the constraint was
/// violated.
pub trait Repository {
    fn user(&mut self, id: UserId) -> Result<Option<User>>;
    fn user_by_email(&mut self, email: &str) -> Result<Option<User>>;
    fn users(&mut self) -> Result<Vec<User>>;
    fn users_by_name(&mut self, firstname: &str, lastname: &str) -> Result<Vec<User>>;
    fn insert_user(&mut self, new_user: NewUser) -> Result<Option<User>>;
    fn update_user(&mut self, id: UserId, changeset: UpdateUser) -> Result<User>;
    fn delete_user(&mut self, id: UserId) -> Result<bool>;

    fn event(&mut self, id: EventId) -> Result<Option<Event>>;
    fn events_for_user(&mut self, filter: &EventsForUserFilter) -> Result<Vec<Event>>;
    fn insert_event(&mut self, new_event: NewEvent) -> Result<Event>;
    fn update_event(&mut self, id: EventId, changeset: UpdateEvent) -> Result<Event>;
    fn cancel_event(&mut self, id: EventId) -> Result<Event>;

    fn attendance(&mut self, user_id: UserId, event_id: EventId) -> Result<Option<Attendance>>;
    fn attendances_for_event(
        &mut self,
        event_id: EventId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>>;
    fn attendances_for_user(
        &mut self,
        user_id: UserId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>>;
    fn insert_attendance(&mut self, new_attendance: NewAttendance) -> Result<Option<Attendance>>;
    fn update_attendance(
        &mut self,
        id: AttendanceId,
        changeset: UpdateAttendance,
    ) -> Result<Attendance>;
    /// Set-based transition of all `registered` attendances of the event to `attended`
    fn mark_registered_as_attended(&mut self, event_id: EventId) -> Result<usize>;

    fn invitation(&mut self, id: InvitationId) -> Result<Option<Invitation>>;
    fn invitation_for_invitee(
        &mut self,
        invitee: UserId,
        event_id: EventId,
    ) -> Result<Option<Invitation>>;
    fn invitations(&mut self, filter: &InvitationFilter) -> Result<Vec<Invitation>>;
    fn insert_invitation(&mut self, new_invitation: NewInvitation) -> Result<Option<Invitation>>;
    fn update_invitation_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> Result<Invitation>;

    fn notification(&mut self, id: NotificationId) -> Result<Option<Notification>>;
    fn notifications_for_recipient(&mut self, recipient: UserId) -> Result<Vec<Notification>>;
    fn insert_notification(&mut self, new_notification: NewNotification) -> Result<Notification>;
    fn mark_notification_read(&mut self, id: NotificationId) -> Result<Notification>;
    fn mark_all_notifications_read(&mut self, recipient: UserId) -> Result<usize>;
}
