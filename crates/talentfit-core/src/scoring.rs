//! Likert response scoring.
//!
//! Two independent trait scales live here. The running session estimate maps
//! the mean scored response onto a theta-like [-3, 3] range. The profile score
//! recomputes the mean from raw responses at finalization and maps it onto
//! [0, 100]. Neither is derived from the other.

use crate::error::AssessmentError;

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Neutral point of the 1..=5 scale.
const LIKERT_MIDPOINT: f64 = 3.0;
/// Stretch applied to the centered mean to produce theta.
const THETA_SCALE: f64 = 1.5;
/// Width of one Likert step on the 0-100 profile scale.
const PROFILE_STEP: f64 = 25.0;

/// Profile score for a trait nobody answered.
pub const NEUTRAL_PROFILE_SCORE: f64 = 50.0;

/// Reject raw values outside 1..=5.
pub fn validate_likert(value: u8) -> Result<u8, AssessmentError> {
    if (LIKERT_MIN..=LIKERT_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(AssessmentError::Validation(format!(
            "response value {value} outside {LIKERT_MIN}..={LIKERT_MAX}"
        )))
    }
}

fn mean(scored: &[u8]) -> Option<f64> {
    if scored.is_empty() {
        return None;
    }
    let sum: u32 = scored.iter().map(|v| *v as u32).sum();
    Some(sum as f64 / scored.len() as f64)
}

/// Running trait estimate from the scored (already reverse-keyed) values.
///
/// A simple average stands in for maximum-likelihood IRT estimation; a single
/// response is used as-is with no smoothing.
pub fn theta_from_scored(scored: &[u8]) -> Option<f64> {
    mean(scored).map(|avg| (avg - LIKERT_MIDPOINT) * THETA_SCALE)
}

/// Finalized 0-100 trait score, or the neutral 50 if there are no responses.
///
/// Halves round to even.
pub fn profile_score_from_scored(scored: &[u8]) -> f64 {
    match mean(scored) {
        Some(avg) => ((avg - 1.0) * PROFILE_STEP).round_ties_even(),
        None => NEUTRAL_PROFILE_SCORE,
    }
}
