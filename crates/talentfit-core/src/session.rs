//! Session state machine.
//!
//! `in_progress` is the only state that accepts responses. It moves to
//! `completed` when the profile is finalized, or to `abandoned`; both are
//! terminal.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AssessmentError;
use crate::model::{CandidateId, Response, Session, SessionStatus, Trait, TraitEstimates};

impl Session {
    /// Create a fresh in-progress session with every trait estimate at 0.0.
    pub fn start(candidate_id: CandidateId) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_id,
            status: SessionStatus::InProgress,
            current_theta: TraitEstimates::neutral(),
            responses: Vec::new(),
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// Fail with `InvalidState` unless the session still accepts changes.
    pub fn ensure_in_progress(&self) -> Result<(), AssessmentError> {
        if self.status.is_terminal() {
            return Err(AssessmentError::invalid_state(
                self.id,
                format!("session is {}", self.status),
            ));
        }
        Ok(())
    }

    /// Append a response and store the recomputed estimate for its trait.
    ///
    /// Rejects terminal sessions and a second answer to the same item.
    pub fn record_response(
        &mut self,
        response: Response,
        scale: Trait,
        theta: f64,
    ) -> Result<(), AssessmentError> {
        self.ensure_in_progress()?;
        if self.has_answered(response.item_id) {
            return Err(AssessmentError::invalid_state(
                self.id,
                format!("item {} already answered", response.item_id),
            ));
        }
        self.responses.push(response);
        self.current_theta.set(scale, theta);
        Ok(())
    }

    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), AssessmentError> {
        self.finish(SessionStatus::Completed, at)
    }

    pub fn abandon(&mut self, at: DateTime<Utc>) -> Result<(), AssessmentError> {
        self.finish(SessionStatus::Abandoned, at)
    }

    fn finish(&mut self, status: SessionStatus, at: DateTime<Utc>) -> Result<(), AssessmentError> {
        self.ensure_in_progress()?;
        self.status = status;
        self.end_time = Some(at);
        Ok(())
    }
}
