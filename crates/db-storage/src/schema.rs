// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

table! {
    use crate::sql_types::*;

    attendances (id) {
        id -> Uuid,
        user_id -> Uuid,
        event_id -> Uuid,
        role -> Attendance_role,
        status -> Attendance_status,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    use crate::sql_types::*;

    events (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Varchar,
        starts_at -> Timestamptz,
        location -> Varchar,
        is_cancelled -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    use crate::sql_types::*;

    invitations (id) {
        id -> Uuid,
        invitor -> Uuid,
        invitee -> Uuid,
        event_id -> Uuid,
        sent_at -> Timestamptz,
        status -> Invitation_status,
    }
}

table! {
    use crate::sql_types::*;

    notifications (id) {
        id -> Uuid,
        recipient -> Uuid,
        message -> Text,
        kind -> Notification_kind,
        created_at -> Timestamptz,
        is_read -> Bool,
    }
}

table! {
    use crate::sql_types::*;

    users (id) {
        id -> Uuid,
        email -> Varchar,
        firstname -> Varchar,
        lastname -> Varchar,
        created_at -> Timestamptz,
    }
}

joinable!(attendances -> events (event_id));
joinable!(attendances -> users (user_id));
joinable!(invitations -> events (event_id));
joinable!(notifications -> users (recipient));

allow_tables_to_appear_in_same_query!(attendances, events, invitations, notifications, users,);
