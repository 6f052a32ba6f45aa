// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

mod common;

use evsched_scheduler_core::users::{NewUserRequest, UpdateUserRequest};
use evsched_scheduler_core::ErrorKind;
use pretty_assertions::assert_eq;

fn request(email: &str, firstname: &str, lastname: &str) -> NewUserRequest {
    NewUserRequest {
        email: email.into(),
        firstname: firstname.into(),
        lastname: lastname.into(),
    }
}

#[test]
fn emails_are_unique_ignoring_case() {
    let ctx = common::setup();
    let users = &ctx.scheduler.users;

    let ada = users
        .create_user(request("Ada@Example.org", "Ada", "Lovelace"))
        .unwrap();
    assert_eq!(ada.email, "ada@example.org");

    let err = users
        .create_user(request("ADA@example.org", "Ada", "Byron"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(users.get_user_by_email("ADA@EXAMPLE.ORG").unwrap(), ada);
    assert_eq!(
        users.get_user_by_email("nobody@example.org").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn invalid_users_are_rejected() {
    let ctx = common::setup();
    let users = &ctx.scheduler.users;

    let err = users
        .create_user(request("not an email", "Ada", "Lovelace"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = users
        .create_user(request("ada@example.org", "", "Lovelace"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    assert!(users.list_users().unwrap().is_empty());
}

#[test]
fn listing_and_searching() {
    let ctx = common::setup();
    let users = &ctx.scheduler.users;

    let grace = users
        .create_user(request("grace@example.org", "Grace", "Hopper"))
        .unwrap();
    let ada = users
        .create_user(request("ada@example.org", "Ada", "Lovelace"))
        .unwrap();

    assert_eq!(users.list_users().unwrap(), vec![ada.clone(), grace]);
    assert_eq!(
        users.find_users_by_name("ada", "LOVELACE").unwrap(),
        vec![ada]
    );
    assert!(users.find_users_by_name("Ada", "Hopper").unwrap().is_empty());
}

#[test]
fn update_only_touches_given_fields() {
    let ctx = common::setup();
    let users = &ctx.scheduler.users;

    let ada = users
        .create_user(request("ada@example.org", "Ada", "Byron"))
        .unwrap();

    let updated = users
        .update_user(
            ada.id,
            UpdateUserRequest {
                firstname: None,
                lastname: Some("Lovelace".into()),
            },
        )
        .unwrap();

    assert_eq!(updated.firstname, "Ada");
    assert_eq!(updated.lastname, "Lovelace");
    assert_eq!(updated.display_name(), "Ada Lovelace");
    assert_eq!(users.get_user(ada.id).unwrap(), updated);
}

#[test]
fn deleting_a_user_removes_their_records() {
    let ctx = common::setup();
    let organizer = ctx.make_user("Olga", "Organizer");
    let alice = ctx.make_user("Alice", "Attendee");
    let event_id = ctx.register(alice.id, ctx.make_event(organizer.id, "Rust Meetup").event.id);
    ctx.scheduler
        .invitations
        .send_invitation(organizer.id, alice.id, event_id)
        .unwrap();

    ctx.scheduler.users.delete_user(alice.id).unwrap();

    assert_eq!(
        ctx.scheduler.users.get_user(alice.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let view = ctx.scheduler.events.get_event(event_id).unwrap();
    assert!(view.attendance_of(alice.id).is_none());
    assert!(view.invitations.is_empty());

    assert_eq!(
        ctx.scheduler.users.delete_user(alice.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
