// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Invitations from organizers to prospective attendees
//!
//! An invitation starts out `pending` and is resolved once to `accepted` or `declined`.
//! Accepting registers the invitee for the event within the same transaction.

use crate::attendance::{self, require_event, require_user};
use crate::authz::authorize_organizer;
use crate::notifications::{messages, notify, notify_all};
use crate::storage::{Repository, Storage};
use crate::{Result, SchedulerError};
use db_storage::attendances::AttendanceRole;
use db_storage::events::EventId;
use db_storage::invitations::{
    Invitation, InvitationFilter, InvitationId, InvitationStatus, NewInvitation,
};
use db_storage::notifications::NotificationKind;
use db_storage::users::UserId;
use std::sync::Arc;

/// Owns the invitation records of all events
pub struct InvitationWorkflow<S> {
    storage: Arc<S>,
}

impl<S: Storage> InvitationWorkflow<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Invite `invitee` to the event, only organizers may invite
    ///
    /// A user can be invited to an event only once, regardless of how earlier invitations
    /// were answered.
    #[tracing::instrument(err, skip_all, fields(%invitor, %invitee, %event_id))]
    pub fn send_invitation(
        &self,
        invitor: UserId,
        invitee: UserId,
        event_id: EventId,
    ) -> Result<Invitation> {
        self.storage
            .transaction(|repo| send_invitation(repo, invitor, invitee, event_id))
    }

    /// Accept or decline a pending invitation as its invitee
    #[tracing::instrument(err, skip_all, fields(%invitee, %invitation_id, %response))]
    pub fn respond_to_invitation(
        &self,
        invitee: UserId,
        invitation_id: InvitationId,
        response: InvitationStatus,
    ) -> Result<Invitation> {
        self.storage
            .transaction(|repo| respond_to_invitation(repo, invitee, invitation_id, response))
    }

    /// Get a single invitation, visible to its invitor and invitee only
    #[tracing::instrument(err, skip_all, fields(%actor, %invitation_id))]
    pub fn get_invitation(&self, actor: UserId, invitation_id: InvitationId) -> Result<Invitation> {
        self.storage.transaction(|repo| {
            let invitation = require_invitation(repo, invitation_id)?;

            if invitation.invitor != actor && invitation.invitee != actor {
                return Err(SchedulerError::forbidden(
                    "only the invitor and the invitee may view an invitation",
                ));
            }

            Ok(invitation)
        })
    }

    /// Invitations matching the filter, most recently sent first
    #[tracing::instrument(err, skip_all)]
    pub fn list_invitations(&self, filter: &InvitationFilter) -> Result<Vec<Invitation>> {
        self.storage.transaction(|repo| repo.invitations(filter))
    }

    /// Invitations the user sent, optionally narrowed down to a status
    pub fn sent_by(
        &self,
        invitor: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>> {
        self.list_invitations(&InvitationFilter {
            invitor: Some(invitor),
            status,
            ..Default::default()
        })
    }

    /// Invitations the user received, optionally narrowed down to a status
    pub fn received_by(
        &self,
        invitee: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>> {
        self.list_invitations(&InvitationFilter {
            invitee: Some(invitee),
            status,
            ..Default::default()
        })
    }

    /// Invitations of an event, optionally narrowed down to a status
    pub fn for_event(
        &self,
        event_id: EventId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>> {
        self.list_invitations(&InvitationFilter {
            event_id: Some(event_id),
            status,
            ..Default::default()
        })
    }
}

fn require_invitation(repo: &mut dyn Repository, invitation_id: InvitationId) -> Result<Invitation> {
    repo.invitation(invitation_id)?
        .ok_or_else(|| SchedulerError::not_found("Invitation", invitation_id))
}

pub(crate) fn send_invitation(
    repo: &mut dyn Repository,
    invitor: UserId,
    invitee: UserId,
    event_id: EventId,
) -> Result<Invitation> {
    let (event, _) = authorize_organizer(repo, invitor, event_id)?;
    require_user(repo, invitee)?;

    if repo.invitation_for_invitee(invitee, event_id)?.is_some() {
        return Err(SchedulerError::conflict(
            "the user has already been invited to this event",
        ));
    }

    let invitation = repo
        .insert_invitation(NewInvitation {
            invitor,
            invitee,
            event_id,
        })?
        .ok_or_else(|| SchedulerError::conflict("the user has already been invited to this event"))?;

    notify(
        repo,
        invitee,
        messages::invitation_received(&event),
        NotificationKind::EventInvitationReceived,
    )?;

    Ok(invitation)
}

pub(crate) fn respond_to_invitation(
    repo: &mut dyn Repository,
    invitee: UserId,
    invitation_id: InvitationId,
    response: InvitationStatus,
) -> Result<Invitation> {
    let invitation = require_invitation(repo, invitation_id)?;

    if invitation.invitee != invitee {
        return Err(SchedulerError::forbidden(
            "only the invitee may respond to an invitation",
        ));
    }

    if invitation.status != InvitationStatus::Pending {
        return Err(SchedulerError::invalid_transition(format!(
            "the invitation has already been {}",
            invitation.status
        )));
    }

    let kind = match response {
        InvitationStatus::Accepted => NotificationKind::InvitationAccepted,
        InvitationStatus::Declined => NotificationKind::InvitationDeclined,
        InvitationStatus::Pending | InvitationStatus::Expired => {
            return Err(SchedulerError::invalid_transition(format!(
                "an invitation can not be answered with {response}"
            )))
        }
    };

    let event = require_event(repo, invitation.event_id)?;
    let invitee_user = require_user(repo, invitee)?;
    let message = messages::invitation_response(&invitee_user, response, &event);

    let invitation = repo.update_invitation_status(invitation_id, response)?;

    if response == InvitationStatus::Accepted {
        attendance::register(repo, invitee, invitation.event_id)?;
    }

    let organizers: Vec<UserId> = repo
        .attendances_for_event(invitation.event_id, None)?
        .into_iter()
        .filter(|attendance| attendance.role == AttendanceRole::Organizer)
        .map(|attendance| attendance.user_id)
        .collect();

    notify_all(repo, organizers, &message, kind)?;

    Ok(invitation)
}

/// Invitees whose invitation to the event is still pending
pub(crate) fn pending_invitees(repo: &mut dyn Repository, event_id: EventId) -> Result<Vec<UserId>> {
    let invitations = repo.invitations(&InvitationFilter {
        event_id: Some(event_id),
        status: Some(InvitationStatus::Pending),
        ..Default::default()
    })?;

    Ok(invitations
        .into_iter()
        .map(|invitation| invitation.invitee)
        .collect())
}
