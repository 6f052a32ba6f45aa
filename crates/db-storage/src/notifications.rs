// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::schema::notifications;
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::{ExpressionMethods, Insertable, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

diesel_newtype! {
    #[derive(Copy)] NotificationId(uuid::Uuid) => diesel::sql_types::Uuid
}

sql_enum!(
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    NotificationKind,
    "notification_kind",
    NotificationKindType,
    {
        EventInvitationReceived = "event_invitation_received",
        InvitationAccepted = "invitation_accepted",
        InvitationDeclined = "invitation_declined",
        EventDetailsUpdated = "event_details_updated",
        EventCancelled = "event_cancelled",
        AddedAsOrganizer = "added_as_organizer",
        RemovedAsOrganizer = "removed_as_organizer",
        KickedFromEvent = "kicked_from_event",
    }
);

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl Notification {
    #[tracing::instrument(err, skip_all, fields(%notification_id))]
    pub fn get(
        conn: &mut DbConnection,
        notification_id: NotificationId,
    ) -> Result<Option<Notification>> {
        let notification = notifications::table
            .filter(notifications::id.eq(notification_id))
            .get_result(conn)
            .optional()?;

        Ok(notification)
    }

    /// All notifications of the recipient, newest first
    #[tracing::instrument(err, skip_all, fields(%recipient))]
    pub fn get_all_for_recipient(
        conn: &mut DbConnection,
        recipient: UserId,
    ) -> Result<Vec<Notification>> {
        let notifications = notifications::table
            .filter(notifications::recipient.eq(recipient))
            .order_by(notifications::created_at.desc())
            .load(conn)?;

        Ok(notifications)
    }

    #[tracing::instrument(err, skip_all, fields(%notification_id))]
    pub fn mark_read(
        conn: &mut DbConnection,
        notification_id: NotificationId,
    ) -> Result<Notification> {
        let notification =
            diesel::update(notifications::table.filter(notifications::id.eq(notification_id)))
                .set(notifications::is_read.eq(true))
                .get_result(conn)?;

        Ok(notification)
    }

    /// Marks every unread notification of the recipient as read
    ///
    /// Returns the number of updated notifications
    #[tracing::instrument(err, skip_all, fields(%recipient))]
    pub fn mark_all_read_for_recipient(conn: &mut DbConnection, recipient: UserId) -> Result<usize> {
        let updated = diesel::update(
            notifications::table
                .filter(notifications::recipient.eq(recipient))
                .filter(notifications::is_read.eq(false)),
        )
        .set(notifications::is_read.eq(true))
        .execute(conn)?;

        Ok(updated)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub recipient: UserId,
    pub message: String,
    pub kind: NotificationKind,
}

impl NewNotification {
    #[tracing::instrument(err, skip_all, fields(recipient = %self.recipient))]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Notification> {
        let notification = self.insert_into(notifications::table).get_result(conn)?;

        Ok(notification)
    }
}
