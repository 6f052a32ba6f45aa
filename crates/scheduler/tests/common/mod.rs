// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

#![allow(dead_code)]

use chrono::{Duration, Utc};
use db_storage::events::{EventId, UpdateEvent};
use db_storage::notifications::{Notification, NotificationKind};
use db_storage::users::{User, UserId};
use evsched_scheduler_core::events::{EventRequest, EventView};
use evsched_scheduler_core::storage::Storage;
use evsched_scheduler_core::users::NewUserRequest;
use evsched_scheduler_core::Scheduler;
use std::sync::Arc;
use test_util::MemoryStorage;

pub struct TestContext {
    pub storage: Arc<MemoryStorage>,
    pub scheduler: Scheduler<MemoryStorage>,
}

pub fn setup() -> TestContext {
    let storage = Arc::new(MemoryStorage::new());
    let scheduler = Scheduler::new(storage.clone());

    TestContext { storage, scheduler }
}

impl TestContext {
    pub fn make_user(&self, firstname: &str, lastname: &str) -> User {
        self.scheduler
            .users
            .create_user(NewUserRequest {
                email: format!(
                    "{}.{}@example.org",
                    firstname.to_lowercase(),
                    lastname.to_lowercase()
                ),
                firstname: firstname.into(),
                lastname: lastname.into(),
            })
            .unwrap()
    }

    pub fn make_event(&self, organizer: UserId, title: &str) -> EventView {
        self.scheduler
            .events
            .create_event(organizer, event_request(title))
            .unwrap()
    }

    /// Registers the user as attendee and returns the id of the event for convenience
    pub fn register(&self, user_id: UserId, event_id: EventId) -> EventId {
        self.scheduler.attendance.register(user_id, event_id).unwrap();
        event_id
    }

    pub fn notifications(&self, user_id: UserId) -> Vec<Notification> {
        self.scheduler
            .notifications
            .notifications_for(user_id)
            .unwrap()
    }

    pub fn notifications_of_kind(&self, user_id: UserId, kind: NotificationKind) -> Vec<Notification> {
        self.notifications(user_id)
            .into_iter()
            .filter(|notification| notification.kind == kind)
            .collect()
    }

    /// Moves the start of the event behind the current time, bypassing the future-date check
    pub fn move_into_past(&self, event_id: EventId) {
        self.storage
            .transaction(|repo| {
                let event = repo.event(event_id)?.expect("event must exist");

                repo.update_event(
                    event_id,
                    UpdateEvent {
                        title: event.title,
                        description: event.description,
                        starts_at: Utc::now() - Duration::days(1),
                        location: event.location,
                        updated_at: Utc::now(),
                    },
                )
            })
            .unwrap();
    }

    pub fn total_notifications(&self, users: &[&User]) -> usize {
        users
            .iter()
            .map(|user| self.notifications(user.id).len())
            .sum()
    }
}

pub fn event_request(title: &str) -> EventRequest {
    EventRequest {
        title: title.into(),
        description: "Monthly get-together".into(),
        starts_at: Utc::now() + Duration::days(7),
        location: "Community Hall".into(),
    }
}
