// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::{Duration, Utc};
use evsched_db_storage::attendances::{
    Attendance, AttendanceRole, AttendanceStatus, NewAttendance, UpdateAttendance,
};
use evsched_db_storage::events::{Event, EventsForUserFilter, Timeframe};
use evsched_db_storage::users::User;
use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::common::{make_event, make_user};

mod common;

#[tokio::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn one_attendance_per_user_and_event() {
    let db_ctx = test_util::database::DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let user = make_user(&mut conn, "Aileen", "Strange");
    let event = make_event(&mut conn, "Planning", Duration::days(1));

    let new_attendance = NewAttendance {
        user_id: user.id,
        event_id: event.id,
        role: AttendanceRole::Attendee,
        status: AttendanceStatus::Registered,
    };

    let first = new_attendance.clone().try_insert(&mut conn).unwrap();
    let second = new_attendance.try_insert(&mut conn).unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(
        Attendance::get_all_for_event(&mut conn, event.id, None)
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn mark_all_registered_as_attended() {
    let db_ctx = test_util::database::DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let event = make_event(&mut conn, "Hackathon", Duration::days(1));

    let statuses = [
        AttendanceStatus::Registered,
        AttendanceStatus::Registered,
        AttendanceStatus::Withdrawn,
        AttendanceStatus::Kicked,
    ];

    for (n, status) in statuses.into_iter().enumerate() {
        let user = make_user(&mut conn, "Attendee", &format!("Number{n}"));

        NewAttendance {
            user_id: user.id,
            event_id: event.id,
            role: AttendanceRole::Attendee,
            status,
        }
        .try_insert(&mut conn)
        .unwrap()
        .unwrap();
    }

    let updated = Attendance::mark_all_registered_as_attended(&mut conn, event.id).unwrap();
    assert_eq!(updated, 2);

    let attended =
        Attendance::get_all_for_event(&mut conn, event.id, Some(AttendanceStatus::Attended))
            .unwrap();
    assert_eq!(attended.len(), 2);

    let kicked =
        Attendance::get_all_for_event(&mut conn, event.id, Some(AttendanceStatus::Kicked)).unwrap();
    assert_eq!(kicked.len(), 1);
}

fn attend(
    conn: &mut database::DbConnection,
    user: &User,
    event: &Event,
    role: AttendanceRole,
    status: AttendanceStatus,
) {
    NewAttendance {
        user_id: user.id,
        event_id: event.id,
        role,
        status,
    }
    .try_insert(conn)
    .unwrap()
    .unwrap();
}

#[tokio::test]
#[serial]
#[ignore = "requires a running postgres instance"]
async fn events_for_user() {
    let db_ctx = test_util::database::DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let user = make_user(&mut conn, "Laura", "Rutherford");

    let later = make_event(&mut conn, "Later", Duration::days(2));
    let sooner = make_event(&mut conn, "Sooner", Duration::days(1));
    let past = make_event(&mut conn, "Past", -Duration::days(1));
    let withdrawn = make_event(&mut conn, "Withdrawn", Duration::days(1));
    let cancelled = make_event(&mut conn, "Cancelled", Duration::days(1));
    Event::cancel(&mut conn, cancelled.id).unwrap();

    attend(&mut conn, &user, &later, AttendanceRole::Organizer, AttendanceStatus::Registered);
    attend(&mut conn, &user, &sooner, AttendanceRole::Attendee, AttendanceStatus::Registered);
    attend(&mut conn, &user, &past, AttendanceRole::Attendee, AttendanceStatus::Attended);
    attend(&mut conn, &user, &withdrawn, AttendanceRole::Attendee, AttendanceStatus::Withdrawn);
    attend(&mut conn, &user, &cancelled, AttendanceRole::Attendee, AttendanceStatus::Registered);

    let mut filter = EventsForUserFilter {
        user_id: user.id,
        role: None,
        timeframe: Timeframe::Upcoming,
        include_cancelled: false,
        now: Utc::now(),
    };

    let titles = |conn: &mut database::DbConnection, filter: &EventsForUserFilter| {
        Event::get_all_for_user(conn, filter)
            .unwrap()
            .into_iter()
            .map(|event| event.title)
            .collect::<Vec<_>>()
    };

    assert_eq!(titles(&mut conn, &filter), ["Sooner", "Later"]);

    filter.include_cancelled = true;
    assert_eq!(titles(&mut conn, &filter), ["Sooner", "Cancelled", "Later"]);

    filter.role = Some(AttendanceRole::Organizer);
    assert_eq!(titles(&mut conn, &filter), ["Later"]);

    filter.role = None;
    filter.timeframe = Timeframe::Past;
    assert_eq!(titles(&mut conn, &filter), ["Past"]);

    let demoted = Attendance::get_for_user_and_event(&mut conn, user.id, later.id)
        .unwrap()
        .unwrap();
    let demoted = UpdateAttendance::role(AttendanceRole::Attendee)
        .apply(&mut conn, demoted.id)
        .unwrap();
    assert_eq!(demoted.role, AttendanceRole::Attendee);
}
