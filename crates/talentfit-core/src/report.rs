//! Assessment report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::TextAnalysis;
use crate::matchmaker::FitResult;
use crate::model::{CandidateId, CandidateProfile, SessionId};

/// The outcome of one finalized assessment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub candidate_id: CandidateId,
    pub session_id: SessionId,
    /// Number of items the candidate answered.
    pub items_answered: usize,
    pub profile: CandidateProfile,
    /// Transcript analysis, if a transcript was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<TextAnalysis>,
    /// Fit against each job profile, in catalog order.
    #[serde(default)]
    pub fits: Vec<FitResult>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl AssessmentReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// The job with the highest fit score, if any fits were computed.
    pub fn best_fit(&self) -> Option<&FitResult> {
        self.fits
            .iter()
            .max_by(|a, b| a.fit_score.total_cmp(&b.fit_score))
    }
}
