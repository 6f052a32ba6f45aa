// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Event scheduler core
//!
//! Attendance and invitation workflows of events, their organizer authorization and the
//! notifications emitted by them. Every operation runs as one transaction of a [`Storage`].
//!
//! # Example
//!
//! ```no_run
//! use anyhow::Result;
//! use database::Db;
//! use evsched_scheduler_core::storage::PgStorage;
//! use evsched_scheduler_core::Scheduler;
//! use std::sync::Arc;
//!
//! fn run(db: Arc<Db>) -> Result<()> {
//!     let scheduler = Scheduler::new(Arc::new(PgStorage::new(db)));
//!
//!     for user in scheduler.users.list_users()? {
//!         println!("{}", user.email);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod attendance;
pub mod authz;
pub mod error;
pub mod events;
pub mod invitations;
pub mod notifications;
pub mod settings;
pub mod storage;
pub mod trace;
pub mod users;

pub use error::{ErrorKind, Result, SchedulerError};

use attendance::AttendanceLedger;
use events::EventWorkflow;
use invitations::InvitationWorkflow;
use notifications::NotificationCenter;
use storage::Storage;
use users::UserDirectory;

/// All scheduling components sharing one storage
pub struct Scheduler<S> {
    pub users: UserDirectory<S>,
    pub notifications: NotificationCenter<S>,
    pub attendance: AttendanceLedger<S>,
    pub invitations: InvitationWorkflow<S>,
    pub events: EventWorkflow<S>,
}

impl<S: Storage> Scheduler<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            users: UserDirectory::new(storage.clone()),
            notifications: NotificationCenter::new(storage.clone()),
            attendance: AttendanceLedger::new(storage.clone()),
            invitations: InvitationWorkflow::new(storage.clone()),
            events: EventWorkflow::new(storage),
        }
    }
}

/// Runs the future and exits the process with an error code if it fails
pub async fn try_or_exit<T, F>(f: F) -> T
where
    F: std::future::Future<Output = anyhow::Result<T>>,
{
    match f.await {
        Ok(ok) => ok,
        Err(err) => {
            if log::log_enabled!(log::Level::Error) {
                log::error!("Crashed with error: {:?}", err);
            } else {
                eprintln!("Crashed with error: {err:?}");
            }

            std::process::exit(-1);
        }
    }
}
