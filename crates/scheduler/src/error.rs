// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use database::DatabaseError;
use std::fmt::Display;
use validator::ValidationErrors;

/// Result type using [`SchedulerError`] as a default Error
pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;

/// Errors returned by the scheduling operations
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// A referenced entity does not exist
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
    /// The actor is not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// A uniqueness or precondition violation
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The entity exists but its status forbids the requested transition
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    /// Malformed caller input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Flat discriminant of [`SchedulerError`], used by callers to map errors onto responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    InvalidTransition,
    InvalidArgument,
    Internal,
}

impl SchedulerError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidTransition(_) => ErrorKind::InvalidTransition,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<diesel::result::Error> for SchedulerError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err.into())
    }
}

impl From<ValidationErrors> for SchedulerError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_keys()
            .map(ToString::to_string)
            .collect();
        fields.sort();

        Self::InvalidArgument(format!("invalid fields: {}", fields.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kinds() {
        assert_eq!(
            SchedulerError::not_found("Event", 42).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SchedulerError::from(DatabaseError::Custom("x".into())).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            SchedulerError::not_found("Event", 42).to_string(),
            "Event `42` not found"
        );
    }
}
