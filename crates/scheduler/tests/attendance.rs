// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

mod common;

use db_storage::attendances::{AttendanceRole, AttendanceStatus};
use db_storage::notifications::NotificationKind;
use evsched_scheduler_core::ErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn register_is_idempotent() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    let first = ctx.scheduler.attendance.register(alice.id, event_id).unwrap();
    let second = ctx.scheduler.attendance.register(alice.id, event_id).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.role, AttendanceRole::Attendee);
    assert_eq!(first.status, AttendanceStatus::Registered);

    let attendances = ctx
        .scheduler
        .attendance
        .attendances_for_event(event_id, None)
        .unwrap();
    assert_eq!(attendances.len(), 2);
}

#[test]
fn register_requires_existing_event_and_user() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let other = common::setup();
    let stranger = other.make_user("Sam", "Stranger");
    let foreign_event = other.make_event(stranger.id, "Elsewhere").event.id;
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    let err = ctx
        .scheduler
        .attendance
        .register(organizer.id, foreign_event)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ctx
        .scheduler
        .attendance
        .register(stranger.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn withdraw_and_register_again_reuses_the_attendance() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    let registered = ctx.scheduler.attendance.register(alice.id, event_id).unwrap();
    let withdrawn = ctx.scheduler.attendance.withdraw(alice.id, event_id).unwrap();
    assert_eq!(withdrawn.id, registered.id);
    assert_eq!(withdrawn.status, AttendanceStatus::Withdrawn);

    let again = ctx.scheduler.attendance.register(alice.id, event_id).unwrap();
    assert_eq!(again.id, registered.id);
    assert_eq!(again.status, AttendanceStatus::Registered);
}

#[test]
fn withdraw_without_attendance_is_a_conflict() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    let err = ctx
        .scheduler
        .attendance
        .withdraw(alice.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn attended_users_cannot_register_again() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.register(alice.id, ctx.make_event(organizer.id, "Rust Meetup").event.id);

    ctx.scheduler
        .attendance
        .mark_attended(organizer.id, alice.id, event_id)
        .unwrap();

    let err = ctx
        .scheduler
        .attendance
        .register(alice.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let status = ctx
        .scheduler
        .attendance
        .attendances_for_user(alice.id, None)
        .unwrap()[0]
        .status;
    assert_eq!(status, AttendanceStatus::Attended);
}

#[test]
fn only_registered_attendances_can_be_marked_attended() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let bob = ctx.make_user("Bob", "Builder");
    let carol = ctx.make_user("Carol", "Nobody");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    ctx.register(alice.id, event_id);
    ctx.register(bob.id, event_id);
    ctx.scheduler.attendance.withdraw(bob.id, event_id).unwrap();

    let attended = ctx
        .scheduler
        .attendance
        .mark_attended(organizer.id, alice.id, event_id)
        .unwrap();
    assert_eq!(attended.status, AttendanceStatus::Attended);

    // a second marking must not succeed silently
    let err = ctx
        .scheduler
        .attendance
        .mark_attended(organizer.id, alice.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    let err = ctx
        .scheduler
        .attendance
        .mark_attended(organizer.id, bob.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    let err = ctx
        .scheduler
        .attendance
        .mark_attended(organizer.id, carol.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let withdrawn = ctx
        .scheduler
        .attendance
        .attendances_for_event(event_id, Some(AttendanceStatus::Withdrawn))
        .unwrap();
    assert_eq!(withdrawn.len(), 1);
    assert_eq!(withdrawn[0].user_id, bob.id);
}

#[test]
fn mark_all_attended_only_touches_registered() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let bob = ctx.make_user("Bob", "Builder");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    ctx.register(alice.id, event_id);
    ctx.register(bob.id, event_id);
    ctx.scheduler.attendance.withdraw(bob.id, event_id).unwrap();

    let updated = ctx
        .scheduler
        .attendance
        .mark_all_attended(organizer.id, event_id)
        .unwrap();
    assert_eq!(updated, 2);

    let updated = ctx
        .scheduler
        .attendance
        .mark_all_attended(organizer.id, event_id)
        .unwrap();
    assert_eq!(updated, 0);

    let view = ctx.scheduler.events.get_event(event_id).unwrap();
    assert_eq!(
        view.attendance_of(alice.id).unwrap().status,
        AttendanceStatus::Attended
    );
    assert_eq!(
        view.attendance_of(organizer.id).unwrap().status,
        AttendanceStatus::Attended
    );
    assert_eq!(
        view.attendance_of(bob.id).unwrap().status,
        AttendanceStatus::Withdrawn
    );
}

#[test]
fn kicked_attendee_keeps_role_on_register() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.register(alice.id, ctx.make_event(organizer.id, "Rust Meetup").event.id);

    let view = ctx
        .scheduler
        .attendance
        .kick(organizer.id, alice.id, event_id)
        .unwrap();
    assert_eq!(
        view.attendance_of(alice.id).unwrap().status,
        AttendanceStatus::Kicked
    );

    let kicked = ctx.notifications_of_kind(alice.id, NotificationKind::KickedFromEvent);
    assert_eq!(kicked.len(), 1);
    assert_eq!(
        kicked[0].message,
        "Olga Organizer removed you from the event: Rust Meetup"
    );

    let attendance = ctx.scheduler.attendance.register(alice.id, event_id).unwrap();
    assert_eq!(attendance.status, AttendanceStatus::Registered);
    assert_eq!(attendance.role, AttendanceRole::Attendee);
}

#[test]
fn kicked_organizer_keeps_role_on_register() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.register(alice.id, ctx.make_event(organizer.id, "Rust Meetup").event.id);

    ctx.scheduler
        .attendance
        .promote_to_organizer(organizer.id, alice.id, event_id)
        .unwrap();
    ctx.scheduler
        .attendance
        .kick(organizer.id, alice.id, event_id)
        .unwrap();

    let attendance = ctx.scheduler.attendance.register(alice.id, event_id).unwrap();
    assert_eq!(attendance.role, AttendanceRole::Organizer);
}

#[test]
fn kicking_a_user_without_attendance_is_not_found() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    let err = ctx
        .scheduler
        .attendance
        .kick(organizer.id, alice.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(ctx.notifications(alice.id).is_empty());
}

#[test]
fn organizer_operations_are_forbidden_for_attendees() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let bob = ctx.make_user("Bob", "Builder");
    let outsider = ctx.make_user("Oscar", "Outsider");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;
    ctx.register(alice.id, event_id);
    ctx.register(bob.id, event_id);

    let before = ctx.scheduler.events.get_event(event_id).unwrap();

    for actor in [alice.id, outsider.id] {
        let results = [
            ctx.scheduler
                .attendance
                .kick(actor, bob.id, event_id)
                .map(drop),
            ctx.scheduler
                .attendance
                .mark_attended(actor, bob.id, event_id)
                .map(drop),
            ctx.scheduler
                .attendance
                .mark_all_attended(actor, event_id)
                .map(drop),
            ctx.scheduler
                .attendance
                .promote_to_organizer(actor, bob.id, event_id)
                .map(drop),
            ctx.scheduler
                .attendance
                .demote_to_attendee(actor, organizer.id, event_id)
                .map(drop),
            ctx.scheduler
                .invitations
                .send_invitation(actor, outsider.id, event_id)
                .map(drop),
            ctx.scheduler
                .events
                .edit_event(event_id, actor, common::event_request("Hijacked"), true)
                .map(drop),
            ctx.scheduler.events.cancel_event(event_id, actor).map(drop),
        ];

        for result in results {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Forbidden);
        }
    }

    let after = ctx.scheduler.events.get_event(event_id).unwrap();
    assert_eq!(before.event, after.event);
    assert_eq!(before.attendances, after.attendances);
    assert!(after.invitations.is_empty());
    assert_eq!(
        ctx.total_notifications(&[&organizer, &alice, &bob, &outsider]),
        0
    );
}

#[test]
fn organizer_operations_on_unknown_event() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let other = common::setup();
    let stranger = other.make_user("Sam", "Stranger");
    let unknown_event = other.make_event(stranger.id, "Elsewhere").event.id;

    let err = ctx
        .scheduler
        .attendance
        .mark_all_attended(organizer.id, unknown_event)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn promote_and_demote_notify_the_target_once() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.register(alice.id, ctx.make_event(organizer.id, "Rust Meetup").event.id);

    let promoted = ctx
        .scheduler
        .attendance
        .promote_to_organizer(organizer.id, alice.id, event_id)
        .unwrap();
    assert_eq!(promoted.role, AttendanceRole::Organizer);
    assert_eq!(promoted.status, AttendanceStatus::Registered);

    // promoting an organizer changes nothing
    ctx.scheduler
        .attendance
        .promote_to_organizer(organizer.id, alice.id, event_id)
        .unwrap();

    let added = ctx.notifications_of_kind(alice.id, NotificationKind::AddedAsOrganizer);
    assert_eq!(added.len(), 1);
    assert_eq!(
        added[0].message,
        "Olga Organizer added you as organizer to the event: Rust Meetup"
    );

    // the new organizer may now demote the creator
    let demoted = ctx
        .scheduler
        .attendance
        .demote_to_attendee(alice.id, organizer.id, event_id)
        .unwrap();
    assert_eq!(demoted.role, AttendanceRole::Attendee);

    let removed = ctx.notifications_of_kind(organizer.id, NotificationKind::RemovedAsOrganizer);
    assert_eq!(removed.len(), 1);
    assert_eq!(
        removed[0].message,
        "Alice Attendee removed you as organizer from the event: Rust Meetup"
    );

    // demoting an attendee changes nothing
    let unchanged = ctx
        .scheduler
        .attendance
        .demote_to_attendee(alice.id, organizer.id, event_id)
        .unwrap();
    assert_eq!(unchanged.role, AttendanceRole::Attendee);
    assert_eq!(
        ctx.notifications_of_kind(organizer.id, NotificationKind::RemovedAsOrganizer)
            .len(),
        1
    );
}

#[test]
fn the_last_organizer_cannot_be_demoted() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    let err = ctx
        .scheduler
        .attendance
        .demote_to_attendee(organizer.id, organizer.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(
        ctx.scheduler
            .attendance
            .role_of(organizer.id, event_id)
            .unwrap(),
        AttendanceRole::Organizer
    );
    assert!(ctx.notifications(organizer.id).is_empty());
}

#[test]
fn promoting_requires_an_attendance() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.make_event(organizer.id, "Rust Meetup").event.id;

    let err = ctx
        .scheduler
        .attendance
        .promote_to_organizer(organizer.id, alice.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ctx
        .scheduler
        .attendance
        .role_of(alice.id, event_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn attendances_of_a_user_across_events() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let first = ctx.make_event(organizer.id, "Rust Meetup").event.id;
    let second = ctx.make_event(organizer.id, "Go Meetup").event.id;

    ctx.register(alice.id, first);
    ctx.register(alice.id, second);
    ctx.scheduler.attendance.withdraw(alice.id, second).unwrap();

    let all = ctx
        .scheduler
        .attendance
        .attendances_for_user(alice.id, None)
        .unwrap();
    assert_eq!(all.len(), 2);

    let registered = ctx
        .scheduler
        .attendance
        .attendances_for_user(alice.id, Some(AttendanceStatus::Registered))
        .unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].event_id, first);
}
