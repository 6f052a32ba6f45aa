// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::events::EventId;
use crate::schema::invitations;
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::pg::Pg;
use diesel::{ExpressionMethods, Insertable, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

diesel_newtype! {
    #[derive(Copy)] InvitationId(uuid::Uuid) => diesel::sql_types::Uuid
}

sql_enum!(
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    InvitationStatus,
    "invitation_status",
    InvitationStatusType,
    {
        Pending = "pending",
        Accepted = "accepted",
        Declined = "declined",
        Expired = "expired",
    }
);

/// Offer of an organizer (invitor) to a user (invitee) to take part in an event
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = invitations)]
pub struct Invitation {
    pub id: InvitationId,
    pub invitor: UserId,
    pub invitee: UserId,
    pub event_id: EventId,
    pub sent_at: DateTime<Utc>,
    pub status: InvitationStatus,
}

/// Narrows down invitation listings, every `None` field matches all invitations
#[derive(Debug, Clone, Default)]
pub struct InvitationFilter {
    pub invitor: Option<UserId>,
    pub invitee: Option<UserId>,
    pub event_id: Option<EventId>,
    pub status: Option<InvitationStatus>,
}

impl InvitationFilter {
    pub fn matches(&self, invitation: &Invitation) -> bool {
        self.invitor.map_or(true, |id| id == invitation.invitor)
            && self.invitee.map_or(true, |id| id == invitation.invitee)
            && self.event_id.map_or(true, |id| id == invitation.event_id)
            && self.status.map_or(true, |status| status == invitation.status)
    }
}

impl Invitation {
    #[tracing::instrument(err, skip_all, fields(%invitation_id))]
    pub fn get(conn: &mut DbConnection, invitation_id: InvitationId) -> Result<Option<Invitation>> {
        let invitation = invitations::table
            .filter(invitations::id.eq(invitation_id))
            .get_result(conn)
            .optional()?;

        Ok(invitation)
    }

    #[tracing::instrument(err, skip_all, fields(%invitee, %event_id))]
    pub fn get_for_invitee_and_event(
        conn: &mut DbConnection,
        invitee: UserId,
        event_id: EventId,
    ) -> Result<Option<Invitation>> {
        let invitation = invitations::table
            .filter(invitations::invitee.eq(invitee))
            .filter(invitations::event_id.eq(event_id))
            .get_result(conn)
            .optional()?;

        Ok(invitation)
    }

    /// Load all invitations matching the filter, most recently sent first
    #[tracing::instrument(err, skip_all)]
    pub fn get_all_filtered(
        conn: &mut DbConnection,
        filter: &InvitationFilter,
    ) -> Result<Vec<Invitation>> {
        let mut query = invitations::table
            .order_by(invitations::sent_at.desc())
            .into_boxed::<Pg>();

        if let Some(invitor) = filter.invitor {
            query = query.filter(invitations::invitor.eq(invitor));
        }

        if let Some(invitee) = filter.invitee {
            query = query.filter(invitations::invitee.eq(invitee));
        }

        if let Some(event_id) = filter.event_id {
            query = query.filter(invitations::event_id.eq(event_id));
        }

        if let Some(status) = filter.status {
            query = query.filter(invitations::status.eq(status));
        }

        let invitations = query.load(conn)?;

        Ok(invitations)
    }
}

/// New invitations always start out as `pending`, `sent_at` is set by the database
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
pub struct NewInvitation {
    pub invitor: UserId,
    pub invitee: UserId,
    pub event_id: EventId,
}

impl NewInvitation {
    /// Tries to insert the invitation into the database
    ///
    /// When yielding a unique key violation, None is returned.
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<Option<Invitation>> {
        let result = self.insert_into(invitations::table).get_result(conn);

        match result {
            Ok(invitation) => Ok(Some(invitation)),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                ..,
            )) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = invitations)]
pub struct UpdateInvitation {
    pub status: InvitationStatus,
}

impl UpdateInvitation {
    #[tracing::instrument(err, skip_all, fields(%invitation_id))]
    pub fn apply(self, conn: &mut DbConnection, invitation_id: InvitationId) -> Result<Invitation> {
        let invitation = diesel::update(invitations::table.filter(invitations::id.eq(invitation_id)))
            .set(self)
            .get_result(conn)?;

        Ok(invitation)
    }
}
