// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! In-memory [`Storage`] for workflow tests
//!
//! Each transaction works on a copy of the state which replaces the shared state only when the
//! transaction closure succeeds. The uniqueness constraints of the database schema are enforced
//! on insert.

use chrono::Utc;
use db_storage::attendances::{
    Attendance, AttendanceId, AttendanceStatus, NewAttendance, UpdateAttendance,
};
use db_storage::events::{Event, EventId, EventsForUserFilter, NewEvent, UpdateEvent};
use db_storage::invitations::{
    Invitation, InvitationFilter, InvitationId, InvitationStatus, NewInvitation,
};
use db_storage::notifications::{NewNotification, Notification, NotificationId};
use db_storage::users::{NewUser, UpdateUser, User, UserId};
use parking_lot::Mutex;
use scheduler::storage::{Repository, Storage};
use scheduler::{Result, SchedulerError};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct State {
    users: Vec<User>,
    events: Vec<Event>,
    attendances: Vec<Attendance>,
    invitations: Vec<Invitation>,
    notifications: Vec<Notification>,
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T>,
    {
        let mut state = self.state.lock();
        let mut working_copy = state.clone();

        let result = f(&mut MemoryRepository {
            state: &mut working_copy,
        });

        if result.is_ok() {
            *state = working_copy;
        }

        result
    }
}

struct MemoryRepository<'s> {
    state: &'s mut State,
}

/// Stable sort, newest first, ties keep the most recently inserted first
fn newest_first<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = items.iter().rev().cloned().collect();
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

impl Repository for MemoryRepository<'_> {
    fn user(&mut self, id: UserId) -> Result<Option<User>> {
        Ok(self.state.users.iter().find(|user| user.id == id).cloned())
    }

    fn user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();

        Ok(self
            .state
            .users
            .iter()
            .find(|user| user.email.to_lowercase() == email)
            .cloned())
    }

    fn users(&mut self) -> Result<Vec<User>> {
        let mut users = self.state.users.clone();
        users.sort_by(|a, b| a.email.cmp(&b.email));

        Ok(users)
    }

    fn users_by_name(&mut self, firstname: &str, lastname: &str) -> Result<Vec<User>> {
        let (firstname, lastname) = (firstname.to_lowercase(), lastname.to_lowercase());

        let mut users: Vec<User> = self
            .state
            .users
            .iter()
            .filter(|user| {
                user.firstname.to_lowercase() == firstname
                    && user.lastname.to_lowercase() == lastname
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));

        Ok(users)
    }

    fn insert_user(&mut self, new_user: NewUser) -> Result<Option<User>> {
        if self
            .state
            .users
            .iter()
            .any(|user| user.email == new_user.email)
        {
            return Ok(None);
        }

        let user = User {
            id: UserId::from(Uuid::new_v4()),
            email: new_user.email,
            firstname: new_user.firstname,
            lastname: new_user.lastname,
            created_at: Utc::now(),
        };
        self.state.users.push(user.clone());

        Ok(Some(user))
    }

    fn update_user(&mut self, id: UserId, changeset: UpdateUser) -> Result<User> {
        let user = self
            .state
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| SchedulerError::not_found("User", id))?;

        if let Some(firstname) = changeset.firstname {
            user.firstname = firstname;
        }
        if let Some(lastname) = changeset.lastname {
            user.lastname = lastname;
        }

        Ok(user.clone())
    }

    fn delete_user(&mut self, id: UserId) -> Result<bool> {
        let before = self.state.users.len();
        self.state.users.retain(|user| user.id != id);

        if self.state.users.len() == before {
            return Ok(false);
        }

        // mirrors ON DELETE CASCADE of the schema
        self.state
            .attendances
            .retain(|attendance| attendance.user_id != id);
        self.state
            .invitations
            .retain(|invitation| invitation.invitor != id && invitation.invitee != id);
        self.state
            .notifications
            .retain(|notification| notification.recipient != id);

        Ok(true)
    }

    fn event(&mut self, id: EventId) -> Result<Option<Event>> {
        Ok(self.state.events.iter().find(|event| event.id == id).cloned())
    }

    fn events_for_user(&mut self, filter: &EventsForUserFilter) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .state
            .attendances
            .iter()
            .filter(|attendance| attendance.user_id == filter.user_id)
            .filter_map(|attendance| {
                self.state
                    .events
                    .iter()
                    .find(|event| event.id == attendance.event_id)
                    .filter(|event| filter.matches(event, attendance.role, attendance.status))
                    .cloned()
            })
            .collect();
        events.sort_by_key(|event| event.starts_at);

        Ok(events)
    }

    fn insert_event(&mut self, new_event: NewEvent) -> Result<Event> {
        let now = Utc::now();
        let event = Event {
            id: EventId::from(Uuid::new_v4()),
            title: new_event.title,
            description: new_event.description,
            starts_at: new_event.starts_at,
            location: new_event.location,
            is_cancelled: false,
            created_at: now,
            updated_at: now,
        };
        self.state.events.push(event.clone());

        Ok(event)
    }

    fn update_event(&mut self, id: EventId, changeset: UpdateEvent) -> Result<Event> {
        let event = self
            .state
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| SchedulerError::not_found("Event", id))?;

        event.title = changeset.title;
        event.description = changeset.description;
        event.starts_at = changeset.starts_at;
        event.location = changeset.location;
        event.updated_at = changeset.updated_at;

        Ok(event.clone())
    }

    fn cancel_event(&mut self, id: EventId) -> Result<Event> {
        let event = self
            .state
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| SchedulerError::not_found("Event", id))?;

        event.is_cancelled = true;
        event.updated_at = Utc::now();

        Ok(event.clone())
    }

    fn attendance(&mut self, user_id: UserId, event_id: EventId) -> Result<Option<Attendance>> {
        Ok(self
            .state
            .attendances
            .iter()
            .find(|attendance| attendance.user_id == user_id && attendance.event_id == event_id)
            .cloned())
    }

    fn attendances_for_event(
        &mut self,
        event_id: EventId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        Ok(self
            .state
            .attendances
            .iter()
            .filter(|attendance| attendance.event_id == event_id)
            .filter(|attendance| status.map_or(true, |status| attendance.status == status))
            .cloned()
            .collect())
    }

    fn attendances_for_user(
        &mut self,
        user_id: UserId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        Ok(self
            .state
            .attendances
            .iter()
            .filter(|attendance| attendance.user_id == user_id)
            .filter(|attendance| status.map_or(true, |status| attendance.status == status))
            .cloned()
            .collect())
    }

    fn insert_attendance(&mut self, new_attendance: NewAttendance) -> Result<Option<Attendance>> {
        let exists = self.state.attendances.iter().any(|attendance| {
            attendance.user_id == new_attendance.user_id
                && attendance.event_id == new_attendance.event_id
        });

        if exists {
            return Ok(None);
        }

        let now = Utc::now();
        let attendance = Attendance {
            id: AttendanceId::from(Uuid::new_v4()),
            user_id: new_attendance.user_id,
            event_id: new_attendance.event_id,
            role: new_attendance.role,
            status: new_attendance.status,
            created_at: now,
            updated_at: now,
        };
        self.state.attendances.push(attendance.clone());

        Ok(Some(attendance))
    }

    fn update_attendance(
        &mut self,
        id: AttendanceId,
        changeset: UpdateAttendance,
    ) -> Result<Attendance> {
        let attendance = self
            .state
            .attendances
            .iter_mut()
            .find(|attendance| attendance.id == id)
            .ok_or_else(|| SchedulerError::not_found("Attendance", id))?;

        if let Some(role) = changeset.role {
            attendance.role = role;
        }
        if let Some(status) = changeset.status {
            attendance.status = status;
        }
        attendance.updated_at = changeset.updated_at;

        Ok(attendance.clone())
    }

    fn mark_registered_as_attended(&mut self, event_id: EventId) -> Result<usize> {
        let now = Utc::now();
        let mut updated = 0;

        for attendance in self.state.attendances.iter_mut().filter(|attendance| {
            attendance.event_id == event_id && attendance.status == AttendanceStatus::Registered
        }) {
            attendance.status = AttendanceStatus::Attended;
            attendance.updated_at = now;
            updated += 1;
        }

        Ok(updated)
    }

    fn invitation(&mut self, id: InvitationId) -> Result<Option<Invitation>> {
        Ok(self
            .state
            .invitations
            .iter()
            .find(|invitation| invitation.id == id)
            .cloned())
    }

    fn invitation_for_invitee(
        &mut self,
        invitee: UserId,
        event_id: EventId,
    ) -> Result<Option<Invitation>> {
        Ok(self
            .state
            .invitations
            .iter()
            .find(|invitation| invitation.invitee == invitee && invitation.event_id == event_id)
            .cloned())
    }

    fn invitations(&mut self, filter: &InvitationFilter) -> Result<Vec<Invitation>> {
        let matching: Vec<Invitation> = self
            .state
            .invitations
            .iter()
            .filter(|invitation| filter.matches(invitation))
            .cloned()
            .collect();

        Ok(newest_first(&matching, |invitation| invitation.sent_at))
    }

    fn insert_invitation(&mut self, new_invitation: NewInvitation) -> Result<Option<Invitation>> {
        let exists = self.state.invitations.iter().any(|invitation| {
            invitation.invitee == new_invitation.invitee
                && invitation.event_id == new_invitation.event_id
        });

        if exists {
            return Ok(None);
        }

        let invitation = Invitation {
            id: InvitationId::from(Uuid::new_v4()),
            invitor: new_invitation.invitor,
            invitee: new_invitation.invitee,
            event_id: new_invitation.event_id,
            sent_at: Utc::now(),
            status: InvitationStatus::Pending,
        };
        self.state.invitations.push(invitation.clone());

        Ok(Some(invitation))
    }

    fn update_invitation_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> Result<Invitation> {
        let invitation = self
            .state
            .invitations
            .iter_mut()
            .find(|invitation| invitation.id == id)
            .ok_or_else(|| SchedulerError::not_found("Invitation", id))?;

        invitation.status = status;

        Ok(invitation.clone())
    }

    fn notification(&mut self, id: NotificationId) -> Result<Option<Notification>> {
        Ok(self
            .state
            .notifications
            .iter()
            .find(|notification| notification.id == id)
            .cloned())
    }

    fn notifications_for_recipient(&mut self, recipient: UserId) -> Result<Vec<Notification>> {
        let matching: Vec<Notification> = self
            .state
            .notifications
            .iter()
            .filter(|notification| notification.recipient == recipient)
            .cloned()
            .collect();

        Ok(newest_first(&matching, |notification| notification.created_at))
    }

    fn insert_notification(&mut self, new_notification: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: NotificationId::from(Uuid::new_v4()),
            recipient: new_notification.recipient,
            message: new_notification.message,
            kind: new_notification.kind,
            created_at: Utc::now(),
            is_read: false,
        };
        self.state.notifications.push(notification.clone());

        Ok(notification)
    }

    fn mark_notification_read(&mut self, id: NotificationId) -> Result<Notification> {
        let notification = self
            .state
            .notifications
            .iter_mut()
            .find(|notification| notification.id == id)
            .ok_or_else(|| SchedulerError::not_found("Notification", id))?;

        notification.is_read = true;

        Ok(notification.clone())
    }

    fn mark_all_notifications_read(&mut self, recipient: UserId) -> Result<usize> {
        let mut updated = 0;

        for notification in self.state.notifications.iter_mut().filter(|notification| {
            notification.recipient == recipient && !notification.is_read
        }) {
            notification.is_read = true;
            updated += 1;
        }

        Ok(updated)
    }
}
