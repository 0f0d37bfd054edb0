//! Assessment error types.
//!
//! Selector and scorer lookups that miss are reported through `Option`/`bool`
//! sentinels by the engine; everything here is a distinguishable failure the
//! caller has to handle.

use std::fmt;

use thiserror::Error;

use crate::model::SessionId;

/// The kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Session,
    Item,
    CandidateProfile,
    JobProfile,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Session => write!(f, "session"),
            EntityKind::Item => write!(f, "item"),
            EntityKind::CandidateProfile => write!(f, "candidate profile"),
            EntityKind::JobProfile => write!(f, "job profile"),
        }
    }
}

/// Errors raised by the assessment engine.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// A referenced session, item, profile or job does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A mutation was attempted that the session's state does not allow.
    #[error("invalid state for session {session}: {reason}")]
    InvalidState { session: SessionId, reason: String },

    /// Structurally malformed input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A repository back end failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl AssessmentError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        AssessmentError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_state(session: SessionId, reason: impl Into<String>) -> Self {
        AssessmentError::InvalidState {
            session,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the failure is an expected "absent" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssessmentError::NotFound { .. })
    }
}
