//! Candidate profile finalization.
//!
//! Folds a completed session's raw responses into the 0-100 profile scale,
//! together with the externally measured cognitive score and CEFR band.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AssessmentError;
use crate::model::{
    CandidateId, CandidateProfile, CefrLevel, Dimension, Item, Response, SessionId, Trait,
};
use crate::scoring::profile_score_from_scored;

/// Highest raw cognitive score (number of puzzles solved).
pub const COGNITIVE_MAX: u8 = 10;
/// Multiplier mapping the cognitive score onto 0-100.
const COGNITIVE_SCALE: f64 = 10.0;

/// Reverse-key and average responses per trait onto the 0-100 profile scale.
///
/// Every trait appears in the result; unanswered ones get the neutral 50.
pub fn aggregate_trait_scores(responses: &[(Response, Item)]) -> BTreeMap<Trait, f64> {
    let mut scored: BTreeMap<Trait, Vec<u8>> =
        Trait::ALL.iter().map(|t| (*t, Vec::new())).collect();
    for (response, item) in responses {
        scored
            .entry(item.scale)
            .or_default()
            .push(item.keyed.apply(response.value));
    }

    scored
        .into_iter()
        .map(|(scale, values)| (scale, profile_score_from_scored(&values)))
        .collect()
}

/// Everything needed to finalize one session.
#[derive(Debug, Clone)]
pub struct ProfileInputs<'a> {
    pub candidate_id: CandidateId,
    pub session_id: SessionId,
    /// Session responses paired with their catalog items.
    pub responses: &'a [(Response, Item)],
    /// Cognitive reasoning score on 0..=10.
    pub cognitive_score: u8,
    pub english_level: CefrLevel,
    pub created_at: DateTime<Utc>,
}

/// Build the immutable candidate profile snapshot.
pub fn build_profile(inputs: ProfileInputs<'_>) -> Result<CandidateProfile, AssessmentError> {
    if inputs.cognitive_score > COGNITIVE_MAX {
        return Err(AssessmentError::Validation(format!(
            "cognitive score {} outside 0..={COGNITIVE_MAX}",
            inputs.cognitive_score
        )));
    }

    let mut scores: BTreeMap<Dimension, f64> = aggregate_trait_scores(inputs.responses)
        .into_iter()
        .map(|(scale, score)| (Dimension::from(scale), score))
        .collect();
    scores.insert(
        Dimension::LogicReasoning,
        inputs.cognitive_score as f64 * COGNITIVE_SCALE,
    );

    Ok(CandidateProfile {
        id: Uuid::new_v4(),
        candidate_id: inputs.candidate_id,
        session_id: inputs.session_id,
        created_at: inputs.created_at,
        scores,
        english_level: inputs.english_level,
    })
}
