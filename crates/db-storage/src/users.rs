// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::lower;
use crate::schema::users;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::{ExpressionMethods, Insertable, OptionalExtension, QueryDsl, RunQueryDsl};

diesel_newtype! {
    #[derive(Copy)] UserId(uuid::Uuid) => diesel::sql_types::Uuid
}

/// Diesel user struct
///
/// Is used as a result in various queries. Represents a user column
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full name as used in notification messages
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn get(conn: &mut DbConnection, id: UserId) -> Result<User> {
        let user = users::table.filter(users::id.eq(id)).get_result(conn)?;

        Ok(user)
    }

    /// Get a user by their email, the comparison is case insensitive
    #[tracing::instrument(err, skip_all)]
    pub fn get_by_email(conn: &mut DbConnection, email: &str) -> Result<Option<User>> {
        let user = users::table
            .filter(lower(users::email).eq(email.to_lowercase()))
            .get_result(conn)
            .optional()?;

        Ok(user)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection) -> Result<Vec<User>> {
        let users = users::table.order_by(users::email.asc()).load(conn)?;

        Ok(users)
    }

    /// Find users by first- and lastname, ignoring case
    #[tracing::instrument(err, skip_all)]
    pub fn find_by_name(
        conn: &mut DbConnection,
        firstname: &str,
        lastname: &str,
    ) -> Result<Vec<User>> {
        let users = users::table
            .filter(lower(users::firstname).eq(firstname.to_lowercase()))
            .filter(lower(users::lastname).eq(lastname.to_lowercase()))
            .order_by(users::email.asc())
            .load(conn)?;

        Ok(users)
    }

    /// Delete the user, owned attendances, invitations and notifications are removed by the
    /// database through `ON DELETE CASCADE`
    ///
    /// Returns false if no user with the given id existed
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn delete_by_id(conn: &mut DbConnection, id: UserId) -> Result<bool> {
        let deleted = diesel::delete(users::table.filter(users::id.eq(id))).execute(conn)?;

        Ok(deleted > 0)
    }
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

impl NewUser {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<User> {
        let user = self.insert_into(users::table).get_result(conn)?;

        Ok(user)
    }

    /// Tries to insert the user into the database
    ///
    /// When yielding a unique key violation (email already taken), None is returned.
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<Option<User>> {
        let result = self.insert_into(users::table).get_result(conn);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                ..,
            )) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Diesel user struct for updates
///
/// Is used in update queries. None fields will be ignored on update queries
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl UpdateUser {
    /// Returns true if applying this update would not change anything
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none() && self.lastname.is_none()
    }

    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn apply(self, conn: &mut DbConnection, user_id: UserId) -> Result<User> {
        if self.is_empty() {
            return User::get(conn, user_id);
        }

        let user = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(self)
            .get_result(conn)?;

        Ok(user)
    }
}
