// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Records notifications as side effects of the other workflows and lets users read them

use crate::attendance::require_user;
use crate::storage::{Repository, Storage};
use crate::{Result, SchedulerError};
use db_storage::notifications::{NewNotification, Notification, NotificationId, NotificationKind};
use db_storage::users::UserId;
use itertools::Itertools;
use std::sync::Arc;

/// Rendering of the notification messages
pub mod messages {
    use db_storage::events::Event;
    use db_storage::invitations::InvitationStatus;
    use db_storage::users::User;

    pub fn invitation_received(event: &Event) -> String {
        format!("You have been invited to the event: {}", event.title)
    }

    pub fn invitation_response(invitee: &User, response: InvitationStatus, event: &Event) -> String {
        format!(
            "{} has {} your invitation to the event: {}",
            invitee.display_name(),
            response,
            event.title
        )
    }

    pub fn event_updated(event: &Event) -> String {
        format!("The details for the event '{}' have been updated.", event.title)
    }

    pub fn event_cancelled(event: &Event) -> String {
        format!("The event '{}' has been cancelled.", event.title)
    }

    pub fn added_as_organizer(actor: &User, event: &Event) -> String {
        format!(
            "{} added you as organizer to the event: {}",
            actor.display_name(),
            event.title
        )
    }

    pub fn removed_as_organizer(actor: &User, event: &Event) -> String {
        format!(
            "{} removed you as organizer from the event: {}",
            actor.display_name(),
            event.title
        )
    }

    pub fn kicked_from_event(actor: &User, event: &Event) -> String {
        format!(
            "{} removed you from the event: {}",
            actor.display_name(),
            event.title
        )
    }
}

/// Persists notifications and serves them to their recipients
pub struct NotificationCenter<S> {
    storage: Arc<S>,
}

impl<S: Storage> NotificationCenter<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// All notifications of the user, newest first
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn notifications_for(&self, user_id: UserId) -> Result<Vec<Notification>> {
        self.storage.transaction(|repo| {
            require_user(repo, user_id)?;

            repo.notifications_for_recipient(user_id)
        })
    }

    /// Marks a single notification as read
    ///
    /// Only the recipient may do so. Marking an already read notification is a no-op.
    #[tracing::instrument(err, skip_all, fields(%actor, %notification_id))]
    pub fn mark_as_read(
        &self,
        actor: UserId,
        notification_id: NotificationId,
    ) -> Result<Notification> {
        self.storage.transaction(|repo| {
            let notification = repo
                .notification(notification_id)?
                .ok_or_else(|| SchedulerError::not_found("Notification", notification_id))?;

            if notification.recipient != actor {
                return Err(SchedulerError::forbidden(
                    "only the recipient may mark a notification as read",
                ));
            }

            if notification.is_read {
                return Ok(notification);
            }

            repo.mark_notification_read(notification_id)
        })
    }

    /// Marks every unread notification of the user as read, returns the number of changed
    /// notifications
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn mark_all_as_read(&self, user_id: UserId) -> Result<usize> {
        self.storage.transaction(|repo| {
            require_user(repo, user_id)?;

            repo.mark_all_notifications_read(user_id)
        })
    }
}

/// Records a notification for a single recipient
pub(crate) fn notify(
    repo: &mut dyn Repository,
    recipient: UserId,
    message: String,
    kind: NotificationKind,
) -> Result<Notification> {
    log::debug!("notifying {recipient} about {kind}");

    repo.insert_notification(NewNotification {
        recipient,
        message,
        kind,
    })
}

/// Records the same notification once for every distinct recipient
///
/// Returns the number of created notifications
pub(crate) fn notify_all(
    repo: &mut dyn Repository,
    recipients: impl IntoIterator<Item = UserId>,
    message: &str,
    kind: NotificationKind,
) -> Result<usize> {
    let mut count = 0;

    for recipient in recipients.into_iter().unique() {
        notify(repo, recipient, message.to_owned(), kind)?;
        count += 1;
    }

    Ok(count)
}
