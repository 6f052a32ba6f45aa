// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::events::EventId;
use crate::schema::attendances;
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::pg::Pg;
use diesel::{ExpressionMethods, Insertable, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

diesel_newtype! {
    #[derive(Copy)] AttendanceId(uuid::Uuid) => diesel::sql_types::Uuid
}

sql_enum!(
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    AttendanceRole,
    "attendance_role",
    AttendanceRoleType,
    {
        Organizer = "organizer",
        Attendee = "attendee",
    }
);

sql_enum!(
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    AttendanceStatus,
    "attendance_status",
    AttendanceStatusType,
    {
        Registered = "registered",
        Attended = "attended",
        Withdrawn = "withdrawn",
        Kicked = "kicked",
    }
);

/// Participation of one user in one event
///
/// There is at most one attendance per (user, event) pair.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = attendances)]
pub struct Attendance {
    pub id: AttendanceId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub role: AttendanceRole,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    #[tracing::instrument(err, skip_all, fields(%user_id, %event_id))]
    pub fn get_for_user_and_event(
        conn: &mut DbConnection,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<Option<Attendance>> {
        let attendance = attendances::table
            .filter(attendances::user_id.eq(user_id))
            .filter(attendances::event_id.eq(event_id))
            .get_result(conn)
            .optional()?;

        Ok(attendance)
    }

    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get_all_for_event(
        conn: &mut DbConnection,
        event_id: EventId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        let mut query = attendances::table
            .filter(attendances::event_id.eq(event_id))
            .order_by(attendances::created_at.asc())
            .into_boxed::<Pg>();

        if let Some(status) = status {
            query = query.filter(attendances::status.eq(status));
        }

        let attendances = query.load(conn)?;

        Ok(attendances)
    }

    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get_all_for_user(
        conn: &mut DbConnection,
        user_id: UserId,
        status: Option<AttendanceStatus>,
    ) -> Result<Vec<Attendance>> {
        let mut query = attendances::table
            .filter(attendances::user_id.eq(user_id))
            .order_by(attendances::created_at.asc())
            .into_boxed::<Pg>();

        if let Some(status) = status {
            query = query.filter(attendances::status.eq(status));
        }

        let attendances = query.load(conn)?;

        Ok(attendances)
    }

    /// Transition every `registered` attendance of the event to `attended` in a single statement
    ///
    /// Returns the number of updated attendances
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn mark_all_registered_as_attended(
        conn: &mut DbConnection,
        event_id: EventId,
    ) -> Result<usize> {
        let updated = diesel::update(
            attendances::table
                .filter(attendances::event_id.eq(event_id))
                .filter(attendances::status.eq(AttendanceStatus::Registered)),
        )
        .set((
            attendances::status.eq(AttendanceStatus::Attended),
            attendances::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;

        Ok(updated)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendances)]
pub struct NewAttendance {
    pub user_id: UserId,
    pub event_id: EventId,
    pub role: AttendanceRole,
    pub status: AttendanceStatus,
}

impl NewAttendance {
    /// Tries to insert the attendance into the database
    ///
    /// When yielding a unique key violation, None is returned.
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<Option<Attendance>> {
        let result = self.insert_into(attendances::table).get_result(conn);

        match result {
            Ok(attendance) => Ok(Some(attendance)),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                ..,
            )) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = attendances)]
pub struct UpdateAttendance {
    pub role: Option<AttendanceRole>,
    pub status: Option<AttendanceStatus>,
    pub updated_at: DateTime<Utc>,
}

impl UpdateAttendance {
    pub fn role(role: AttendanceRole) -> Self {
        Self {
            role: Some(role),
            status: None,
            updated_at: Utc::now(),
        }
    }

    pub fn status(status: AttendanceStatus) -> Self {
        Self {
            role: None,
            status: Some(status),
            updated_at: Utc::now(),
        }
    }

    #[tracing::instrument(err, skip_all, fields(%attendance_id))]
    pub fn apply(self, conn: &mut DbConnection, attendance_id: AttendanceId) -> Result<Attendance> {
        let attendance = diesel::update(attendances::table.filter(attendances::id.eq(attendance_id)))
            .set(self)
            .get_result(conn)?;

        Ok(attendance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_match_postgres_enum() {
        assert_eq!(AttendanceRole::Organizer.as_str(), "organizer");
        assert_eq!(AttendanceStatus::Kicked.to_string(), "kicked");
        assert_eq!("withdrawn".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Withdrawn));
        assert!("invited".parse::<AttendanceStatus>().is_err());
    }
}
