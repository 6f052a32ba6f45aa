// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::attendances::{AttendanceRole, AttendanceStatus};
use crate::schema::{attendances, events};
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::pg::Pg;
use diesel::{
    BoolExpressionMethods, ExpressionMethods, Insertable, JoinOnDsl, OptionalExtension, QueryDsl, RunQueryDsl,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

diesel_newtype! {
    #[derive(Copy)] EventId(uuid::Uuid) => diesel::sql_types::Uuid
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Selects events relative to a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Timeframe {
    /// Events starting after the reference time
    Upcoming,
    /// Events starting at or before the reference time
    Past,
}

impl Timeframe {
    /// Returns true if an event starting at `starts_at` falls into this timeframe
    pub fn contains(self, starts_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Timeframe::Upcoming => starts_at > now,
            Timeframe::Past => starts_at <= now,
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UPCOMING" => Ok(Self::Upcoming),
            "PAST" => Ok(Self::Past),
            _ => Err(format!("unknown timeframe {s:?}, expected UPCOMING or PAST")),
        }
    }
}

/// Parameters to select the events a user takes part in
///
/// Only attendances with status `registered` or `attended` count as taking part.
#[derive(Debug, Clone)]
pub struct EventsForUserFilter {
    pub user_id: UserId,
    pub role: Option<AttendanceRole>,
    pub timeframe: Timeframe,
    pub include_cancelled: bool,
    pub now: DateTime<Utc>,
}

impl EventsForUserFilter {
    /// Checks a single event/attendance pair against this filter
    pub fn matches(&self, event: &Event, role: AttendanceRole, status: AttendanceStatus) -> bool {
        matches!(
            status,
            AttendanceStatus::Registered | AttendanceStatus::Attended
        ) && self.role.map_or(true, |wanted| wanted == role)
            && (self.include_cancelled || !event.is_cancelled)
            && self.timeframe.contains(event.starts_at, self.now)
    }
}

impl Event {
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get(conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let event = events::table
            .filter(events::id.eq(event_id))
            .get_result(conn)?;

        Ok(event)
    }

    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get_opt(conn: &mut DbConnection, event_id: EventId) -> Result<Option<Event>> {
        let event = events::table
            .filter(events::id.eq(event_id))
            .get_result(conn)
            .optional()?;

        Ok(event)
    }

    /// Get all events the user takes part in, ordered by their start time
    #[tracing::instrument(err, skip_all, fields(user_id = %filter.user_id))]
    pub fn get_all_for_user(
        conn: &mut DbConnection,
        filter: &EventsForUserFilter,
    ) -> Result<Vec<Event>> {
        let mut query = events::table
            .inner_join(attendances::table.on(attendances::event_id.eq(events::id)))
            .filter(attendances::user_id.eq(filter.user_id))
            .filter(
                attendances::status
                    .eq(AttendanceStatus::Registered)
                    .or(attendances::status.eq(AttendanceStatus::Attended)),
            )
            .select(events::all_columns)
            .order_by(events::starts_at.asc())
            .into_boxed::<Pg>();

        if let Some(role) = filter.role {
            query = query.filter(attendances::role.eq(role));
        }

        if !filter.include_cancelled {
            query = query.filter(events::is_cancelled.eq(false));
        }

        query = match filter.timeframe {
            Timeframe::Upcoming => query.filter(events::starts_at.gt(filter.now)),
            Timeframe::Past => query.filter(events::starts_at.le(filter.now)),
        };

        let events = query.load(conn)?;

        Ok(events)
    }

    /// Soft cancel the event, nothing is deleted
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn cancel(conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let event = diesel::update(events::table.filter(events::id.eq(event_id)))
            .set((
                events::is_cancelled.eq(true),
                events::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)?;

        Ok(event)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
}

impl NewEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Event> {
        let event = self.insert_into(events::table).get_result(conn)?;

        Ok(event)
    }
}

/// Replaces every mutable field of an event
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
pub struct UpdateEvent {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub updated_at: DateTime<Utc>,
}

impl UpdateEvent {
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn apply(self, conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let event = diesel::update(events::table.filter(events::id.eq(event_id)))
            .set(self)
            .get_result(conn)?;

        Ok(event)
    }
}
