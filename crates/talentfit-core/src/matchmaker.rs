//! Candidate-to-job fit scoring.
//!
//! Fit is 100% minus the weighted mean absolute gap between the candidate's
//! profile and the job's ideal values, boosted by 10% and capped at 100.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{CandidateId, CandidateProfile, Dimension, JobProfile};

/// Largest possible gap on a 0-100 dimension.
const MAX_GAP: f64 = 100.0;
/// Curve applied to the raw fit so that good matches read like grades.
const FIT_BOOST: f64 = 1.1;
/// Candidate value assumed when the profile lacks a targeted dimension.
const DEFAULT_CANDIDATE_VALUE: f64 = 50.0;

const GREEN_GAP_BELOW: f64 = 10.0;
const YELLOW_GAP_BELOW: f64 = 20.0;
const HIGHLY_RECOMMENDED_ABOVE: f64 = 85.0;
const RECOMMENDED_ABOVE: f64 = 70.0;

/// Traffic-light classification of a single dimension gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    Green,
    Yellow,
    Red,
}

impl FitStatus {
    pub fn from_gap(gap: f64) -> Self {
        if gap < GREEN_GAP_BELOW {
            FitStatus::Green
        } else if gap < YELLOW_GAP_BELOW {
            FitStatus::Yellow
        } else {
            FitStatus::Red
        }
    }
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStatus::Green => write!(f, "green"),
            FitStatus::Yellow => write!(f, "yellow"),
            FitStatus::Red => write!(f, "red"),
        }
    }
}

/// Hiring recommendation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    /// Tier for a boosted fit percentage. Both thresholds are exclusive.
    pub fn from_fit(fit_percentage: f64) -> Self {
        if fit_percentage > HIGHLY_RECOMMENDED_ABOVE {
            Recommendation::HighlyRecommended
        } else if fit_percentage > RECOMMENDED_ABOVE {
            Recommendation::Recommended
        } else {
            Recommendation::NotRecommended
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::HighlyRecommended => write!(f, "Highly Recommended"),
            Recommendation::Recommended => write!(f, "Recommended"),
            Recommendation::NotRecommended => write!(f, "Not Recommended"),
        }
    }
}

/// Per-dimension detail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionFit {
    pub candidate: f64,
    pub ideal: f64,
    pub weight: f64,
    pub gap: f64,
    pub status: FitStatus,
}

/// Outcome of comparing one candidate profile with one job profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub candidate_id: CandidateId,
    pub job_id: String,
    pub job_title: String,
    /// Boosted fit percentage rounded to one decimal.
    pub fit_score: f64,
    pub details: BTreeMap<Dimension, DimensionFit>,
    pub recommendation: Recommendation,
}

/// Raw and boosted fit percentages, unrounded.
fn fit_percentage(weighted_gap: f64, total_possible_weight: f64) -> f64 {
    let raw = if total_possible_weight == 0.0 {
        0.0
    } else {
        100.0 - (weighted_gap / total_possible_weight * 100.0)
    };
    (raw * FIT_BOOST).min(100.0)
}

/// Round to one decimal from the exact binary value.
///
/// Scaling by 10 first would round twice and can turn 36.85000000000000142
/// into a 368.5 tie.
fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Compare a candidate profile against a job's target profile.
pub fn evaluate_fit(profile: &CandidateProfile, job: &JobProfile) -> FitResult {
    let mut weighted_gap = 0.0;
    let mut total_possible_weight = 0.0;
    let mut details = BTreeMap::new();

    for (dimension, target) in &job.target_profile {
        let candidate = profile.score(*dimension).unwrap_or(DEFAULT_CANDIDATE_VALUE);
        let gap = (candidate - target.ideal).abs();

        weighted_gap += gap * target.weight;
        total_possible_weight += MAX_GAP * target.weight;

        details.insert(
            *dimension,
            DimensionFit {
                candidate,
                ideal: target.ideal,
                weight: target.weight,
                gap,
                status: FitStatus::from_gap(gap),
            },
        );
    }

    let fit = fit_percentage(weighted_gap, total_possible_weight);

    FitResult {
        candidate_id: profile.candidate_id,
        job_id: job.id.clone(),
        job_title: job.title.clone(),
        fit_score: round_to_tenth(fit),
        details,
        recommendation: Recommendation::from_fit(fit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CefrLevel, TargetSpec};
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(scores: &[(Dimension, f64)]) -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            candidate_id: 1,
            session_id: Uuid::nil(),
            created_at: Utc::now(),
            scores: scores.iter().copied().collect(),
            english_level: CefrLevel::B2,
        }
    }

    fn job(targets: &[(Dimension, f64, f64)]) -> JobProfile {
        JobProfile {
            id: "job".into(),
            title: "Job".into(),
            description: String::new(),
            target_profile: targets
                .iter()
                .map(|(d, ideal, weight)| {
                    (
                        *d,
                        TargetSpec {
                            ideal: *ideal,
                            weight: *weight,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn exact_match_is_green_and_capped() {
        let p = profile(&[(Dimension::Openness, 50.0)]);
        let j = job(&[(Dimension::Openness, 50.0, 1.0)]);
        let fit = evaluate_fit(&p, &j);
        let row = &fit.details[&Dimension::Openness];
        assert_eq!(row.gap, 0.0);
        assert_eq!(row.status, FitStatus::Green);
        assert_eq!(fit.fit_score, 100.0);
        assert_eq!(fit.recommendation, Recommendation::HighlyRecommended);
    }

    #[test]
    fn maximal_gap_stays_zero_after_boost() {
        let p = profile(&[(Dimension::Conscientiousness, 0.0)]);
        let j = job(&[(Dimension::Conscientiousness, 100.0, 1.0)]);
        let fit = evaluate_fit(&p, &j);
        assert_eq!(fit.details[&Dimension::Conscientiousness].gap, 100.0);
        assert_eq!(fit.fit_score, 0.0);
        assert_eq!(fit.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn missing_candidate_dimension_defaults_to_fifty() {
        let p = profile(&[]);
        let j = job(&[(Dimension::LogicReasoning, 80.0, 2.0)]);
        let fit = evaluate_fit(&p, &j);
        let row = &fit.details[&Dimension::LogicReasoning];
        assert_eq!(row.candidate, 50.0);
        assert_eq!(row.gap, 30.0);
        assert_eq!(row.status, FitStatus::Red);
        // 100 - 30 = 70, boosted to 77
        assert_eq!(fit.fit_score, 77.0);
        assert_eq!(fit.recommendation, Recommendation::Recommended);
    }

    #[test]
    fn weights_scale_gap_contribution() {
        let p = profile(&[(Dimension::Openness, 60.0), (Dimension::Extraversion, 40.0)]);
        let j = job(&[
            (Dimension::Openness, 80.0, 3.0),
            (Dimension::Extraversion, 40.0, 1.0),
        ]);
        let fit = evaluate_fit(&p, &j);
        // weighted gap 60 over 400 possible -> 85% raw -> 93.5% boosted
        assert_eq!(fit.fit_score, 93.5);
        assert_eq!(fit.details[&Dimension::Openness].status, FitStatus::Red);
        assert_eq!(fit.details[&Dimension::Extraversion].status, FitStatus::Green);
    }

    #[test]
    fn fit_score_rounds_from_exact_value() {
        let p = profile(&[(Dimension::Openness, 54.0), (Dimension::Extraversion, 81.0)]);
        let j = job(&[
            (Dimension::Openness, 5.0, 0.5),
            (Dimension::Extraversion, 11.0, 2.5),
        ]);
        let fit = evaluate_fit(&p, &j);
        // boosted fit is 36.85000000000000142, just above the half
        assert_eq!(fit.fit_score, 36.9);
        assert_eq!(fit.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn round_to_tenth_of_representable_values() {
        assert_eq!(round_to_tenth(0.75), 0.8);
        assert_eq!(round_to_tenth(77.00000000000001), 77.0);
        assert_eq!(round_to_tenth(93.5), 93.5);
        assert_eq!(round_to_tenth(100.0), 100.0);
    }

    #[test]
    fn empty_target_profile_scores_zero() {
        let p = profile(&[(Dimension::Openness, 50.0)]);
        let j = job(&[]);
        let fit = evaluate_fit(&p, &j);
        assert_eq!(fit.fit_score, 0.0);
        assert!(fit.details.is_empty());
        assert_eq!(fit.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn gap_status_boundaries() {
        assert_eq!(FitStatus::from_gap(9.99), FitStatus::Green);
        assert_eq!(FitStatus::from_gap(10.0), FitStatus::Yellow);
        assert_eq!(FitStatus::from_gap(19.99), FitStatus::Yellow);
        assert_eq!(FitStatus::from_gap(20.0), FitStatus::Red);
    }

    #[test]
    fn recommendation_thresholds_are_exclusive() {
        assert_eq!(Recommendation::from_fit(85.0), Recommendation::Recommended);
        assert_eq!(
            Recommendation::from_fit(85.01),
            Recommendation::HighlyRecommended
        );
        assert_eq!(Recommendation::from_fit(70.0), Recommendation::NotRecommended);
        assert_eq!(Recommendation::from_fit(70.01), Recommendation::Recommended);
    }

    #[test]
    fn recommendation_serializes_as_label() {
        let json = serde_json::to_string(&Recommendation::HighlyRecommended).unwrap();
        assert_eq!(json, "\"Highly Recommended\"");
        assert_eq!(Recommendation::NotRecommended.to_string(), "Not Recommended");
    }
}
