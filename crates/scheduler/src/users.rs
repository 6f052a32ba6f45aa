// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Directory of the users known to the scheduler
//!
//! Resolves users by id or email for the other workflows. Deleting a user removes their
//! attendances, invitations and notifications but leaves events untouched.

use crate::attendance::require_user;
use crate::storage::Storage;
use crate::{Result, SchedulerError};
use db_storage::users::{NewUser, UpdateUser, User, UserId};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub firstname: String,
    #[validate(length(min = 1, max = 50))]
    pub lastname: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub lastname: Option<String>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserDirectory<S> {
    storage: Arc<S>,
}

impl<S: Storage> UserDirectory<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Register a new user, the email must not be in use yet
    #[tracing::instrument(err, skip_all)]
    pub fn create_user(&self, request: NewUserRequest) -> Result<User> {
        let request = NewUserRequest {
            email: normalize_email(&request.email),
            ..request
        };
        request.validate()?;

        self.storage.transaction(|repo| {
            if repo.user_by_email(&request.email)?.is_some() {
                return Err(SchedulerError::conflict("the email is already in use"));
            }

            let user = repo
                .insert_user(NewUser {
                    email: request.email,
                    firstname: request.firstname,
                    lastname: request.lastname,
                })?
                .ok_or_else(|| SchedulerError::conflict("the email is already in use"))?;

            log::info!("created user {}", user.id);

            Ok(user)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get_user(&self, user_id: UserId) -> Result<User> {
        self.storage
            .transaction(|repo| require_user(repo, user_id))
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_user_by_email(&self, email: &str) -> Result<User> {
        let email = normalize_email(email);

        self.storage.transaction(|repo| {
            repo.user_by_email(&email)?
                .ok_or_else(|| SchedulerError::not_found("User", &email))
        })
    }

    /// All users ordered by their email
    #[tracing::instrument(err, skip_all)]
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.storage.transaction(|repo| repo.users())
    }

    /// Users with exactly this first- and lastname, ignoring case
    #[tracing::instrument(err, skip_all)]
    pub fn find_users_by_name(&self, firstname: &str, lastname: &str) -> Result<Vec<User>> {
        self.storage
            .transaction(|repo| repo.users_by_name(firstname, lastname))
    }

    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn update_user(&self, user_id: UserId, request: UpdateUserRequest) -> Result<User> {
        request.validate()?;

        self.storage.transaction(|repo| {
            require_user(repo, user_id)?;

            repo.update_user(
                user_id,
                UpdateUser {
                    firstname: request.firstname,
                    lastname: request.lastname,
                },
            )
        })
    }

    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn delete_user(&self, user_id: UserId) -> Result<()> {
        self.storage.transaction(|repo| {
            if !repo.delete_user(user_id)? {
                return Err(SchedulerError::not_found("User", user_id));
            }

            log::info!("deleted user {user_id}");

            Ok(())
        })
    }
}
