// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.inject_custom("CREATE TYPE attendance_role AS ENUM ('organizer', 'attendee')");
    migr.inject_custom(
        "CREATE TYPE attendance_status AS ENUM ('registered', 'attended', 'withdrawn', 'kicked')",
    );
    migr.inject_custom(
        "CREATE TYPE invitation_status AS ENUM ('pending', 'accepted', 'declined', 'expired')",
    );
    migr.inject_custom(
        "CREATE TYPE notification_kind AS ENUM (
            'event_invitation_received',
            'invitation_accepted',
            'invitation_declined',
            'event_details_updated',
            'event_cancelled',
            'added_as_organizer',
            'removed_as_organizer',
            'kicked_from_event'
        )",
    );

    migr.create_table("users", |table| {
        table.add_column(
            "id",
            types::custom("UUID PRIMARY KEY DEFAULT gen_random_uuid()"),
        );
        table.add_column("email", types::varchar(100).unique(true));
        table.add_column("firstname", types::varchar(50));
        table.add_column("lastname", types::varchar(50));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
    });

    migr.create_table("events", |table| {
        table.add_column(
            "id",
            types::custom("UUID PRIMARY KEY DEFAULT gen_random_uuid()"),
        );
        table.add_column("title", types::varchar(100));
        table.add_column("description", types::varchar(1000));
        table.add_column("starts_at", types::custom("TIMESTAMPTZ"));
        table.add_column("location", types::varchar(100));
        table.add_column("is_cancelled", types::custom("BOOLEAN DEFAULT FALSE"));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.add_column("updated_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
    });

    migr.create_table("attendances", |table| {
        table.add_column(
            "id",
            types::custom("UUID PRIMARY KEY DEFAULT gen_random_uuid()"),
        );
        table.add_column(
            "user_id",
            types::custom("UUID REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "event_id",
            types::custom("UUID REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column("role", types::custom("attendance_role"));
        table.add_column("status", types::custom("attendance_status"));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.add_column("updated_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.inject_custom("UNIQUE (user_id, event_id)");
    });

    migr.create_table("invitations", |table| {
        table.add_column(
            "id",
            types::custom("UUID PRIMARY KEY DEFAULT gen_random_uuid()"),
        );
        table.add_column(
            "invitor",
            types::custom("UUID REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "invitee",
            types::custom("UUID REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "event_id",
            types::custom("UUID REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column("sent_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.add_column(
            "status",
            types::custom("invitation_status DEFAULT 'pending'"),
        );
        table.inject_custom("UNIQUE (invitee, event_id)");
    });

    migr.create_table("notifications", |table| {
        table.add_column(
            "id",
            types::custom("UUID PRIMARY KEY DEFAULT gen_random_uuid()"),
        );
        table.add_column(
            "recipient",
            types::custom("UUID REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column("message", types::text());
        table.add_column("kind", types::custom("notification_kind"));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.add_column("is_read", types::custom("BOOLEAN DEFAULT FALSE"));
    });

    migr.inject_custom("CREATE INDEX attendances_event_id_idx ON attendances (event_id)");
    migr.inject_custom("CREATE INDEX invitations_event_id_idx ON invitations (event_id)");
    migr.inject_custom("CREATE INDEX notifications_recipient_idx ON notifications (recipient)");

    migr.make::<Pg>()
}
