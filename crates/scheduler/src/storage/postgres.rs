// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::{Repository, Storage};
use crate::Result;
use database::{Db, DbConnection, OptionalExt};
use db_storage::attendances::{
    Attendance, AttendanceId, AttendanceStatus, NewAttendance, UpdateAttendance,
};
use db_storage::events::{Event, EventId, EventsForUserFilter, NewEvent, UpdateEvent};
use db_storage::invitations::{
    Invitation, InvitationFilter, InvitationId, InvitationStatus, NewInvitation, UpdateInvitation,
};
use db_storage::notifications::{NewNotification, Notification, NotificationId};
use db_storage::users::{NewUser, UpdateUser, User, UserId};
use diesel::Connection;
use std::sync::Arc;

/// [`Storage`] backed by the postgres connection pool
#[derive(Debug, Clone)]
pub struct PgStorage {
    db: Arc<Db>,
}

impl PgStorage {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

impl Storage for PgStorage {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T>,
    {
        let mut conn = self.db.get_conn()?;

        conn.transaction(|conn| f(&mut PgRepository { conn }))
    }
}

struct PgRepository<'c> {
    conn: &'c mut DbConnection,
}

impl Repository for PgRepository<'_> {
    fn user(&mut self, id: UserId) -> Result<Option<User>> {
        Ok(User::get(self.conn, id).optional()?)
    }

    fn user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        Ok(User::get_by_email(self.conn, email)?)
    }

    fn users(&mut self) -> Result<Vec<User>> {
        Ok(User::get_all(self.conn)?)
    }

    fn users_by_name(&mut self, firstname: &str, lastname: &str) -> Result<Vec<User>> {
        Ok(User::find_by_name(self.conn, firstname, lastname)?)
    }

    fn insert_user(&mut self, new_user: NewUser) -> Result<Option<User>> {
        Ok(new_user.try_insert(self.conn)?)
    }

    fn update_user(&mut self, id: UserId, changeset: UpdateUser) -> Result<User> {
        Ok(changeset.apply(self.conn, id)?)
    }

    fn delete_user(&mut self, id: UserId) -> Result<bool> {
        Ok(User::delete_by_id(self.conn, id)?)
    }

    fn event(&mut self, id: EventId) -> Result<Option<Event>> {
        Ok(Event::get_opt(self.conn, id)?)
    }

    fn events_for_user(&mut self, filter: &EventsForUserFilter) -> Result<Vec<Event>> {
        Ok(Event::get_all_for_user(self.conn, filter)?)
    }

    fn insert_event(&mut self, new_event: NewEvent) -> Result<Event> {
        Ok(new_event.insert(self.conn)?)
    }

    fn update_event(&mut self, id: EventId, changeset: UpdateEvent) -> Result<Event> {
        Ok(changeset.apply(self.conn, id)?)
    }

    fn cancel_event(&mut self, id: EventId) -> Result<Event> {
        Ok(Event::cancel(self.conn, id)?)
    }

    fn attendance(&mut self, user_id: UserId, event_id: EventId) -> Result<Option<Attendance>> {
        Ok(Attendance::get_for_user_and_event(
            self.conn, user_id, event_id,
        )?)
    }

    fn attendances_for_event(
        &mut self,
        event_id: EventId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        Ok(Attendance::get_all_for_event(self.conn, event_id, status)?)
    }

    fn attendances_for_user(
        &mut self,
        user_id: UserId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        Ok(Attendance::get_all_for_user(self.conn, user_id, status)?)
    }

    fn insert_attendance(&mut self, new_attendance: NewAttendance) -> Result<Option<Attendance>> {
        Ok(new_attendance.try_insert(self.conn)?)
    }

    fn update_attendance(
        &mut self,
        id: AttendanceId,
        changeset: UpdateAttendance,
    ) -> Result<Attendance> {
        Ok(changeset.apply(self.conn, id)?)
    }

    fn mark_registered_as_attended(&mut self, event_id: EventId) -> Result<usize> {
        Ok(Attendance::mark_all_registered_as_attended(
            self.conn, event_id,
        )?)
    }

    fn invitation(&mut self, id: InvitationId) -> Result<Option<Invitation>> {
        Ok(Invitation::get(self.conn, id)?)
    }

    fn invitation_for_invitee(
        &mut self,
        invitee: UserId,
        event_id: EventId,
    ) -> Result<Option<Invitation>> {
        Ok(Invitation::get_for_invitee_and_event(
            self.conn, invitee, event_id,
        )?)
    }

    fn invitations(&mut self, filter: &InvitationFilter) -> Result<Vec<Invitation>> {
        Ok(Invitation::get_all_filtered(self.conn, filter)?)
    }

    fn insert_invitation(&mut self, new_invitation: NewInvitation) -> Result<Option<Invitation>> {
        Ok(new_invitation.try_insert(self.conn)?)
    }

    fn update_invitation_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> Result<Invitation> {
        Ok(UpdateInvitation { status }.apply(self.conn, id)?)
    }

    fn notification(&mut self, id: NotificationId) -> Result<Option<Notification>> {
        Ok(Notification::get(self.conn, id)?)
    }

    fn notifications_for_recipient(&mut self, recipient: UserId) -> Result<Vec<Notification>> {
        Ok(Notification::get_all_for_recipient(self.conn, recipient)?)
    }

    fn insert_notification(&mut self, new_notification: NewNotification) -> Result<Notification> {
        Ok(new_notification.insert(self.conn)?)
    }

    fn mark_notification_read(&mut self, id: NotificationId) -> Result<Notification> {
        Ok(Notification::mark_read(self.conn, id)?)
    }

    fn mark_all_notifications_read(&mut self, recipient: UserId) -> Result<usize> {
        Ok(Notification::mark_all_read_for_recipient(
            self.conn, recipient,
        )?)
    }
}
