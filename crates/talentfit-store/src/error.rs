//! Store error types.

use thiserror::Error;

use talentfit_core::model::SessionId;

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A session was saved that was never created.
    #[error("session {0} was never created")]
    UnknownSession(SessionId),

    /// A job profile id is already used by a job with a different title.
    #[error("job id {id} already belongs to {existing_title:?}")]
    JobIdConflict { id: String, existing_title: String },
}
