// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Attendance records and their lifecycle
//!
//! Status transitions of an attendance:
//!
//! ```text
//!           register              mark attended
//! (none) ────────────▶ REGISTERED ──────────────▶ ATTENDED
//!                       │     ▲
//!              withdraw │     │ register
//!                       ▼     │
//!                 WITHDRAWN / KICKED
//! ```
//!
//! `kick` moves every status to KICKED and `withdraw` moves every status to WITHDRAWN.

use crate::authz::authorize_organizer;
use crate::events::{load_event_view, EventView};
use crate::notifications::{messages, notify};
use crate::storage::{Repository, Storage};
use crate::{Result, SchedulerError};
use db_storage::attendances::{
    Attendance, AttendanceRole, AttendanceStatus, NewAttendance, UpdateAttendance,
};
use db_storage::events::{Event, EventId};
use db_storage::notifications::NotificationKind;
use db_storage::users::{User, UserId};
use std::sync::Arc;

/// Operations which change the status of an attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Register,
    Withdraw,
    Kick,
    MarkAttended,
}

/// Outcome of applying a [`StatusChange`] to a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    To(AttendanceStatus),
}

/// Computes the status an attendance moves to when `change` is applied to `current`
///
/// `withdraw` and `kick` are accepted from every status.
pub fn transition(current: AttendanceStatus, change: StatusChange) -> Result<Transition> {
    use AttendanceStatus::*;

    match (change, current) {
        (StatusChange::Register, Registered) => Ok(Transition::Unchanged),
        (StatusChange::Register, Withdrawn | Kicked) => Ok(Transition::To(Registered)),
        (StatusChange::Register, Attended) => Err(SchedulerError::conflict(
            "cannot register again after having attended the event",
        )),
        (StatusChange::Withdraw, _) => Ok(Transition::To(Withdrawn)),
        (StatusChange::Kick, _) => Ok(Transition::To(Kicked)),
        (StatusChange::MarkAttended, Registered) => Ok(Transition::To(Attended)),
        (StatusChange::MarkAttended, current) => Err(SchedulerError::invalid_transition(format!(
            "cannot mark a {current} attendance as attended"
        ))),
    }
}

/// Owns the attendance records of all events
pub struct AttendanceLedger<S> {
    storage: Arc<S>,
}

impl<S: Storage> AttendanceLedger<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Let the user join the event as attendee
    ///
    /// Idempotent for registered users, reactivates withdrawn and kicked attendances with their
    /// previous role.
    #[tracing::instrument(err, skip_all, fields(%user_id, %event_id))]
    pub fn register(&self, user_id: UserId, event_id: EventId) -> Result<Attendance> {
        self.storage
            .transaction(|repo| register(repo, user_id, event_id))
    }

    #[tracing::instrument(err, skip_all, fields(%user_id, %event_id))]
    pub fn withdraw(&self, user_id: UserId, event_id: EventId) -> Result<Attendance> {
        self.storage
            .transaction(|repo| withdraw(repo, user_id, event_id))
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn kick(&self, actor: UserId, target: UserId, event_id: EventId) -> Result<EventView> {
        self.storage.transaction(|repo| {
            kick(repo, actor, target, event_id)?;

            load_event_view(repo, event_id)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn mark_attended(
        &self,
        actor: UserId,
        target: UserId,
        event_id: EventId,
    ) -> Result<Attendance> {
        self.storage
            .transaction(|repo| mark_attended(repo, actor, target, event_id))
    }

    /// Returns the number of attendances which moved from registered to attended
    #[tracing::instrument(err, skip_all, fields(%actor, %event_id))]
    pub fn mark_all_attended(&self, actor: UserId, event_id: EventId) -> Result<usize> {
        self.storage
            .transaction(|repo| mark_all_attended(repo, actor, event_id))
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn promote_to_organizer(
        &self,
        actor: UserId,
        target: UserId,
        event_id: EventId,
    ) -> Result<Attendance> {
        self.storage
            .transaction(|repo| promote_to_organizer(repo, actor, target, event_id))
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn demote_to_attendee(
        &self,
        actor: UserId,
        target: UserId,
        event_id: EventId,
    ) -> Result<Attendance> {
        self.storage
            .transaction(|repo| demote_to_attendee(repo, actor, target, event_id))
    }

    #[tracing::instrument(err, skip_all, fields(%user_id, %event_id))]
    pub fn role_of(&self, user_id: UserId, event_id: EventId) -> Result<AttendanceRole> {
        self.storage
            .transaction(|repo| role_of(repo, user_id, event_id))
    }

    /// All attendances of the event, optionally narrowed down to a status
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn attendances_for_event(
        &self,
        event_id: EventId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        self.storage.transaction(|repo| {
            require_event(repo, event_id)?;

            repo.attendances_for_event(event_id, status)
        })
    }

    /// All attendances of the user, optionally narrowed down to a status
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn attendances_for_user(
        &self,
        user_id: UserId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        self.storage.transaction(|repo| {
            require_user(repo, user_id)?;

            repo.attendances_for_user(user_id, status)
        })
    }
}

pub(crate) fn require_event(repo: &mut dyn Repository, event_id: EventId) -> Result<Event> {
    repo.event(event_id)?
        .ok_or_else(|| SchedulerError::not_found("Event", event_id))
}

pub(crate) fn require_user(repo: &mut dyn Repository, user_id: UserId) -> Result<User> {
    repo.user(user_id)?
        .ok_or_else(|| SchedulerError::not_found("User", user_id))
}

fn apply_change(
    repo: &mut dyn Repository,
    attendance: Attendance,
    change: StatusChange,
) -> Result<Attendance> {
    match transition(attendance.status, change)? {
        Transition::Unchanged => Ok(attendance),
        Transition::To(status) => {
            repo.update_attendance(attendance.id, UpdateAttendance::status(status))
        }
    }
}

/// Finds the attendance of `user_id` in an attendance snapshot of one event
fn find_in(attendances: &[Attendance], user_id: UserId) -> Option<&Attendance> {
    attendances
        .iter()
        .find(|attendance| attendance.user_id == user_id)
}

pub(crate) fn register(
    repo: &mut dyn Repository,
    user_id: UserId,
    event_id: EventId,
) -> Result<Attendance> {
    require_event(repo, event_id)?;
    require_user(repo, user_id)?;

    match repo.attendance(user_id, event_id)? {
        Some(attendance) => apply_change(repo, attendance, StatusChange::Register),
        None => repo
            .insert_attendance(NewAttendance {
                user_id,
                event_id,
                role: AttendanceRole::Attendee,
                status: AttendanceStatus::Registered,
            })?
            .ok_or_else(|| {
                SchedulerError::conflict("an attendance for this user and event already exists")
            }),
    }
}

pub(crate) fn withdraw(
    repo: &mut dyn Repository,
    user_id: UserId,
    event_id: EventId,
) -> Result<Attendance> {
    require_event(repo, event_id)?;

    let attendance = repo.attendance(user_id, event_id)?.ok_or_else(|| {
        SchedulerError::conflict("the user has no attendance for this event to withdraw")
    })?;

    apply_change(repo, attendance, StatusChange::Withdraw)
}

pub(crate) fn kick(
    repo: &mut dyn Repository,
    actor: UserId,
    target: UserId,
    event_id: EventId,
) -> Result<Attendance> {
    let (event, attendances) = authorize_organizer(repo, actor, event_id)?;
    let actor = require_user(repo, actor)?;
    require_user(repo, target)?;

    let attendance = find_in(&attendances, target)
        .cloned()
        .ok_or_else(|| SchedulerError::not_found("Attendance", target))?;

    let attendance = apply_change(repo, attendance, StatusChange::Kick)?;

    notify(
        repo,
        target,
        messages::kicked_from_event(&actor, &event),
        NotificationKind::KickedFromEvent,
    )?;

    Ok(attendance)
}

pub(crate) fn mark_attended(
    repo: &mut dyn Repository,
    actor: UserId,
    target: UserId,
    event_id: EventId,
) -> Result<Attendance> {
    let (_, attendances) = authorize_organizer(repo, actor, event_id)?;

    let attendance = find_in(&attendances, target).cloned().ok_or_else(|| {
        SchedulerError::conflict("the user has no attendance for this event to mark")
    })?;

    apply_change(repo, attendance, StatusChange::MarkAttended)
}

pub(crate) fn mark_all_attended(
    repo: &mut dyn Repository,
    actor: UserId,
    event_id: EventId,
) -> Result<usize> {
    authorize_organizer(repo, actor, event_id)?;

    let updated = repo.mark_registered_as_attended(event_id)?;

    log::debug!("marked {updated} attendances of event {event_id} as attended");

    Ok(updated)
}

pub(crate) fn promote_to_organizer(
    repo: &mut dyn Repository,
    actor: UserId,
    target: UserId,
    event_id: EventId,
) -> Result<Attendance> {
    let (event, attendances) = authorize_organizer(repo, actor, event_id)?;

    let attendance = find_in(&attendances, target)
        .cloned()
        .ok_or_else(|| SchedulerError::not_found("Attendance", target))?;

    if attendance.role == AttendanceRole::Organizer {
        return Ok(attendance);
    }

    let actor = require_user(repo, actor)?;
    let attendance = repo.update_attendance(
        attendance.id,
        UpdateAttendance::role(AttendanceRole::Organizer),
    )?;

    notify(
        repo,
        target,
        messages::added_as_organizer(&actor, &event),
        NotificationKind::AddedAsOrganizer,
    )?;

    Ok(attendance)
}

pub(crate) fn demote_to_attendee(
    repo: &mut dyn Repository,
    actor: UserId,
    target: UserId,
    event_id: EventId,
) -> Result<Attendance> {
    let (event, attendances) = authorize_organizer(repo, actor, event_id)?;

    let attendance = find_in(&attendances, target)
        .cloned()
        .ok_or_else(|| SchedulerError::not_found("Attendance", target))?;

    if attendance.role != AttendanceRole::Organizer {
        return Ok(attendance);
    }

    let organizers = attendances
        .iter()
        .filter(|attendance| attendance.role == AttendanceRole::Organizer)
        .count();

    if organizers <= 1 {
        return Err(SchedulerError::conflict(
            "cannot remove the only organizer of the event",
        ));
    }

    let actor = require_user(repo, actor)?;
    let attendance = repo.update_attendance(
        attendance.id,
        UpdateAttendance::role(AttendanceRole::Attendee),
    )?;

    notify(
        repo,
        target,
        messages::removed_as_organizer(&actor, &event),
        NotificationKind::RemovedAsOrganizer,
    )?;

    Ok(attendance)
}

/// Users holding a registered attendance for the event
pub(crate) fn registered_users(repo: &mut dyn Repository, event_id: EventId) -> Result<Vec<UserId>> {
    Ok(repo
        .attendances_for_event(event_id, Some(AttendanceStatus::Registered))?
        .into_iter()
        .map(|attendance| attendance.user_id)
        .collect())
}

pub(crate) fn role_of(
    repo: &mut dyn Repository,
    user_id: UserId,
    event_id: EventId,
) -> Result<AttendanceRole> {
    repo.attendance(user_id, event_id)?
        .map(|attendance| attendance.role)
        .ok_or_else(|| SchedulerError::not_found("Attendance", user_id))
}
