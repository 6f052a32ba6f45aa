// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Organizer authorization shared by all workflows

use crate::storage::Repository;
use crate::{Result, SchedulerError};
use db_storage::attendances::{Attendance, AttendanceRole};
use db_storage::events::{Event, EventId};
use db_storage::users::UserId;

/// Checks that `actor` holds the organizer role in the given attendance set of an event
///
/// Fails with [`SchedulerError::Forbidden`] otherwise.
pub fn require_organizer(actor: UserId, attendances: &[Attendance]) -> Result<()> {
    let is_organizer = attendances
        .iter()
        .any(|attendance| attendance.user_id == actor && attendance.role == AttendanceRole::Organizer);

    if is_organizer {
        Ok(())
    } else {
        Err(SchedulerError::forbidden(format!(
            "user {actor} is not an organizer of this event"
        )))
    }
}

/// Loads the event and its attendances, then checks that `actor` organizes it
///
/// Returns the event together with the attendance snapshot used for the check.
pub(crate) fn authorize_organizer(
    repo: &mut dyn Repository,
    actor: UserId,
    event_id: EventId,
) -> Result<(Event, Vec<Attendance>)> {
    let event = repo
        .event(event_id)?
        .ok_or_else(|| SchedulerError::not_found("Event", event_id))?;

    let attendances = repo.attendances_for_event(event_id, None)?;

    require_organizer(actor, &attendances)?;

    Ok((event, attendances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use chrono::Utc;
    use db_storage::attendances::{AttendanceId, AttendanceStatus};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn attendance(user_id: UserId, role: AttendanceRole, status: AttendanceStatus) -> Attendance {
        let now = Utc::now();

        Attendance {
            id: AttendanceId::from(Uuid::new_v4()),
            user_id,
            event_id: EventId::from(Uuid::nil()),
            role,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn organizer_passes() {
        let organizer = UserId::from(Uuid::new_v4());
        let attendances = [
            attendance(UserId::from(Uuid::new_v4()), AttendanceRole::Attendee, AttendanceStatus::Registered),
            attendance(organizer, AttendanceRole::Organizer, AttendanceStatus::Registered),
        ];

        assert!(require_organizer(organizer, &attendances).is_ok());
    }

    #[test]
    fn attendee_and_stranger_are_forbidden() {
        let attendee = UserId::from(Uuid::new_v4());
        let attendances = [attendance(attendee, AttendanceRole::Attendee, AttendanceStatus::Registered)];

        let err = require_organizer(attendee, &attendances).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = require_organizer(UserId::from(Uuid::new_v4()), &attendances).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = require_organizer(attendee, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}
