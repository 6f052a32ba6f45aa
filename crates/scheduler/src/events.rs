// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Event lifecycle and the organizer operations on an event

use crate::attendance::{self, registered_users, require_event, require_user};
use crate::authz::authorize_organizer;
use crate::invitations::pending_invitees;
use crate::notifications::{messages, notify_all};
use crate::storage::{Repository, Storage};
use crate::{Result, SchedulerError};
use chrono::{DateTime, Utc};
use db_storage::attendances::{Attendance, AttendanceRole, AttendanceStatus, NewAttendance};
use db_storage::events::{Event, EventId, EventsForUserFilter, NewEvent, Timeframe, UpdateEvent};
use db_storage::invitations::{Invitation, InvitationFilter};
use db_storage::notifications::NotificationKind;
use db_storage::users::UserId;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Fields of an event which are provided by its organizers
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventRequest {
    #[validate(length(min = 3, max = 100))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: String,
    pub starts_at: DateTime<Utc>,
    #[validate(length(min = 3, max = 100))]
    pub location: String,
}

impl EventRequest {
    /// Validates the field constraints and that the event starts after `now`
    fn validate_at(&self, now: DateTime<Utc>) -> Result<()> {
        self.validate()?;

        if self.starts_at <= now {
            return Err(SchedulerError::invalid_argument(
                "the event must start in the future",
            ));
        }

        Ok(())
    }
}

/// Snapshot of an event together with its attendances and invitations
#[derive(Debug, Clone)]
pub struct EventView {
    pub event: Event,
    pub attendances: Vec<Attendance>,
    pub invitations: Vec<Invitation>,
}

impl EventView {
    /// The attendance of `user_id` in this event, if any
    pub fn attendance_of(&self, user_id: UserId) -> Option<&Attendance> {
        self.attendances
            .iter()
            .find(|attendance| attendance.user_id == user_id)
    }

    pub fn organizers(&self) -> impl Iterator<Item = UserId> + '_ {
        self.attendances
            .iter()
            .filter(|attendance| attendance.role == AttendanceRole::Organizer)
            .map(|attendance| attendance.user_id)
    }
}

/// An event paired with the role the requesting user holds in it
#[derive(Debug, Clone)]
pub struct EventWithRole {
    pub event: Event,
    pub role: AttendanceRole,
}

pub(crate) fn load_event_view(repo: &mut dyn Repository, event_id: EventId) -> Result<EventView> {
    let event = require_event(repo, event_id)?;
    let attendances = repo.attendances_for_event(event_id, None)?;
    let invitations = repo.invitations(&InvitationFilter {
        event_id: Some(event_id),
        ..Default::default()
    })?;

    Ok(EventView {
        event,
        attendances,
        invitations,
    })
}

/// Registered attendees and pending invitees, the audience of event wide announcements
fn participants(repo: &mut dyn Repository, event_id: EventId) -> Result<Vec<UserId>> {
    let mut audience = registered_users(repo, event_id)?;
    audience.extend(pending_invitees(repo, event_id)?);

    Ok(audience)
}

/// Owns the lifecycle of events
pub struct EventWorkflow<S> {
    storage: Arc<S>,
}

impl<S: Storage> EventWorkflow<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Create a new event, the creator becomes its first organizer
    #[tracing::instrument(err, skip_all, fields(%organizer))]
    pub fn create_event(&self, organizer: UserId, request: EventRequest) -> Result<EventView> {
        request.validate_at(Utc::now())?;

        self.storage.transaction(|repo| {
            require_user(repo, organizer)?;

            let event = repo.insert_event(NewEvent {
                title: request.title,
                description: request.description,
                starts_at: request.starts_at,
                location: request.location,
            })?;

            repo.insert_attendance(NewAttendance {
                user_id: organizer,
                event_id: event.id,
                role: AttendanceRole::Organizer,
                status: AttendanceStatus::Registered,
            })?
            .ok_or_else(|| SchedulerError::conflict("the organizer is already attending"))?;

            log::info!("user {organizer} created event {}", event.id);

            load_event_view(repo, event.id)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get_event(&self, event_id: EventId) -> Result<EventView> {
        self.storage
            .transaction(|repo| load_event_view(repo, event_id))
    }

    /// Replace all fields of the event
    ///
    /// With `notify_participants` set, registered attendees and pending invitees are notified.
    #[tracing::instrument(err, skip_all, fields(%event_id, %actor, notify_participants = notify_participants))]
    pub fn edit_event(
        &self,
        event_id: EventId,
        actor: UserId,
        request: EventRequest,
        notify_participants: bool,
    ) -> Result<EventView> {
        self.storage.transaction(|repo| {
            authorize_organizer(repo, actor, event_id)?;
            request.validate_at(Utc::now())?;

            let event = repo.update_event(
                event_id,
                UpdateEvent {
                    title: request.title,
                    description: request.description,
                    starts_at: request.starts_at,
                    location: request.location,
                    updated_at: Utc::now(),
                },
            )?;

            if notify_participants {
                let audience = participants(repo, event_id)?;
                let notified = notify_all(
                    repo,
                    audience,
                    &messages::event_updated(&event),
                    NotificationKind::EventDetailsUpdated,
                )?;

                log::debug!("notified {notified} participants about the update of {event_id}");
            }

            load_event_view(repo, event_id)
        })
    }

    /// Soft cancel the event and notify registered attendees and pending invitees
    ///
    /// Attendances and invitations keep their status. Cancelling a cancelled event does nothing.
    #[tracing::instrument(err, skip_all, fields(%event_id, %actor))]
    pub fn cancel_event(&self, event_id: EventId, actor: UserId) -> Result<EventView> {
        self.storage.transaction(|repo| {
            let (event, _) = authorize_organizer(repo, actor, event_id)?;

            if event.is_cancelled {
                return load_event_view(repo, event_id);
            }

            let event = repo.cancel_event(event_id)?;

            let audience = participants(repo, event_id)?;
            notify_all(
                repo,
                audience,
                &messages::event_cancelled(&event),
                NotificationKind::EventCancelled,
            )?;

            log::info!("user {actor} cancelled event {event_id}");

            load_event_view(repo, event_id)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn make_attendee_organizer(
        &self,
        actor: UserId,
        target: UserId,
        event_id: EventId,
    ) -> Result<EventView> {
        self.storage.transaction(|repo| {
            attendance::promote_to_organizer(repo, actor, target, event_id)?;

            load_event_view(repo, event_id)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn remove_organizer_role(
        &self,
        actor: UserId,
        target: UserId,
        event_id: EventId,
    ) -> Result<EventView> {
        self.storage.transaction(|repo| {
            attendance::demote_to_attendee(repo, actor, target, event_id)?;

            load_event_view(repo, event_id)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn kick_user_from_event(
        &self,
        actor: UserId,
        target: UserId,
        event_id: EventId,
    ) -> Result<EventView> {
        self.storage.transaction(|repo| {
            attendance::kick(repo, actor, target, event_id)?;

            load_event_view(repo, event_id)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %target, %event_id))]
    pub fn mark_attended(
        &self,
        actor: UserId,
        target: UserId,
        event_id: EventId,
    ) -> Result<EventView> {
        self.storage.transaction(|repo| {
            attendance::mark_attended(repo, actor, target, event_id)?;

            load_event_view(repo, event_id)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%actor, %event_id))]
    pub fn mark_all_attended(&self, actor: UserId, event_id: EventId) -> Result<EventView> {
        self.storage.transaction(|repo| {
            attendance::mark_all_attended(repo, actor, event_id)?;

            load_event_view(repo, event_id)
        })
    }

    /// Events the user is registered for or attended, each paired with the user's role
    ///
    /// `timeframe` must be either `UPCOMING` or `PAST`. Cancelled events are left out unless
    /// `include_cancelled` is set.
    #[tracing::instrument(err, skip_all, fields(%user_id, ?role, %timeframe, include_cancelled = include_cancelled))]
    pub fn get_filtered_events_with_role(
        &self,
        user_id: UserId,
        role: Option<AttendanceRole>,
        timeframe: &str,
        include_cancelled: bool,
    ) -> Result<Vec<EventWithRole>> {
        let timeframe: Timeframe = timeframe.parse().map_err(SchedulerError::InvalidArgument)?;

        self.storage.transaction(|repo| {
            require_user(repo, user_id)?;

            let filter = EventsForUserFilter {
                user_id,
                role,
                timeframe,
                include_cancelled,
                now: Utc::now(),
            };

            repo.events_for_user(&filter)?
                .into_iter()
                .map(|event| {
                    let role = attendance::role_of(repo, user_id, event.id)?;

                    Ok(EventWithRole { event, role })
                })
                .collect()
        })
    }
}
