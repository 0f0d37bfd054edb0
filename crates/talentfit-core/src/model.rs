//! Core data model types for talentfit.
//!
//! These are the fundamental types that the whole talentfit system uses to
//! represent catalog items, test sessions, responses, candidate profiles and
//! job profiles. Trait and dimension keys are closed enums so that malformed
//! score mappings are rejected at the boundary instead of deep in scoring.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog item identifier, assigned by the item store on load.
pub type ItemId = u32;
/// External reference to a candidate.
pub type CandidateId = u64;
/// Test session identifier.
pub type SessionId = Uuid;

// ---------------------------------------------------------------------------
// Traits and keying
// ---------------------------------------------------------------------------

/// One of the five Big-Five personality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    /// Every trait, in canonical OCEAN order.
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trait {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openness" | "o" => Ok(Trait::Openness),
            "conscientiousness" | "c" => Ok(Trait::Conscientiousness),
            "extraversion" | "e" => Ok(Trait::Extraversion),
            "agreeableness" | "a" => Ok(Trait::Agreeableness),
            "neuroticism" | "n" => Ok(Trait::Neuroticism),
            other => Err(format!("unknown trait: {other}")),
        }
    }
}

/// Scoring direction of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keying {
    /// A high raw response means a high standing on the trait.
    #[default]
    Plus,
    /// Reverse-scored: a high raw response means a low standing.
    Minus,
}

impl Keying {
    /// Convert a raw 1..=5 Likert response into its trait-aligned value.
    pub fn apply(self, raw: u8) -> u8 {
        match self {
            Keying::Plus => raw,
            Keying::Minus => 6u8.saturating_sub(raw),
        }
    }
}

impl fmt::Display for Keying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keying::Plus => write!(f, "plus"),
            Keying::Minus => write!(f, "minus"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// An immutable assessment question from the item catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Store-assigned identifier.
    pub id: ItemId,
    /// Statement shown to the candidate.
    pub text: String,
    /// Trait this item measures.
    #[serde(rename = "trait")]
    pub scale: Trait,
    /// Scoring direction.
    #[serde(default)]
    pub keyed: Keying,
    /// Whether this item detects inattentive or dishonest responding.
    #[serde(default)]
    pub is_validity_check: bool,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Lifecycle status of a test session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    /// Terminal sessions accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Abandoned)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::InProgress => write!(f, "in_progress"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Running per-trait estimates ("theta") for a session.
///
/// Always holds all five traits; deserializing a mapping that lacks one fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Trait, f64>", into = "BTreeMap<Trait, f64>")]
pub struct TraitEstimates(BTreeMap<Trait, f64>);

impl TraitEstimates {
    /// All five traits at 0.0.
    pub fn neutral() -> Self {
        Self(Trait::ALL.iter().map(|t| (*t, 0.0)).collect())
    }

    pub fn get(&self, scale: Trait) -> f64 {
        self.0.get(&scale).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, scale: Trait, theta: f64) {
        self.0.insert(scale, theta);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        self.0.iter().map(|(t, v)| (*t, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TraitEstimates {
    fn default() -> Self {
        Self::neutral()
    }
}

impl TryFrom<BTreeMap<Trait, f64>> for TraitEstimates {
    type Error = String;

    fn try_from(map: BTreeMap<Trait, f64>) -> Result<Self, Self::Error> {
        if let Some(missing) = Trait::ALL.iter().find(|t| !map.contains_key(t)) {
            return Err(format!("trait estimates missing {missing}"));
        }
        Ok(Self(map))
    }
}

impl From<TraitEstimates> for BTreeMap<Trait, f64> {
    fn from(estimates: TraitEstimates) -> Self {
        estimates.0
    }
}

/// One candidate's test attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub candidate_id: CandidateId,
    pub status: SessionStatus,
    /// Running theta-like estimate per trait, nominally in [-3, 3].
    pub current_theta: TraitEstimates,
    /// Responses in submission order.
    #[serde(default)]
    pub responses: Vec<Response>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Session {
    /// Identifiers of the items already answered in this session.
    pub fn answered_items(&self) -> HashSet<ItemId> {
        self.responses.iter().map(|r| r.item_id).collect()
    }

    pub fn has_answered(&self, item_id: ItemId) -> bool {
        self.responses.iter().any(|r| r.item_id == item_id)
    }
}

/// A single submitted answer. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub session_id: SessionId,
    pub item_id: ItemId,
    /// Raw Likert value in 1..=5.
    pub value: u8,
    /// Dwell time before answering.
    pub latency_ms: u64,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// A scored dimension of a candidate profile and a job target profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
    /// Cognitive reasoning score, rescaled to 0-100.
    #[serde(rename = "Logic_Reasoning")]
    LogicReasoning,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Openness,
        Dimension::Conscientiousness,
        Dimension::Extraversion,
        Dimension::Agreeableness,
        Dimension::Neuroticism,
        Dimension::LogicReasoning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Openness => "Openness",
            Dimension::Conscientiousness => "Conscientiousness",
            Dimension::Extraversion => "Extraversion",
            Dimension::Agreeableness => "Agreeableness",
            Dimension::Neuroticism => "Neuroticism",
            Dimension::LogicReasoning => "Logic_Reasoning",
        }
    }
}

impl From<Trait> for Dimension {
    fn from(scale: Trait) -> Self {
        match scale {
            Trait::Openness => Dimension::Openness,
            Trait::Conscientiousness => Dimension::Conscientiousness,
            Trait::Extraversion => Dimension::Extraversion,
            Trait::Agreeableness => Dimension::Agreeableness,
            Trait::Neuroticism => Dimension::Neuroticism,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logic_reasoning" | "logic" | "cognitive" => Ok(Dimension::LogicReasoning),
            other => other
                .parse::<Trait>()
                .map(Dimension::from)
                .map_err(|_| format!("unknown profile dimension: {s}")),
        }
    }
}

/// CEFR language proficiency band.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CefrLevel {
    A1,
    A2,
    #[default]
    B1,
    B2,
    C1,
    C2,
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        };
        f.write_str(s)
    }
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            other => Err(format!("unknown CEFR level: {other}")),
        }
    }
}

/// Finalized snapshot of a candidate's standing, produced once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub candidate_id: CandidateId,
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    /// Normalized 0-100 value per dimension.
    pub scores: BTreeMap<Dimension, f64>,
    /// Language proficiency indicator.
    pub english_level: CefrLevel,
}

impl CandidateProfile {
    pub fn score(&self, dimension: Dimension) -> Option<f64> {
        self.scores.get(&dimension).copied()
    }
}

/// Desired standing on one dimension for a job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Ideal value on the 0-100 scale.
    #[serde(default = "default_ideal")]
    pub ideal: f64,
    /// Relative importance of this dimension.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            ideal: default_ideal(),
            weight: default_weight(),
        }
    }
}

fn default_ideal() -> f64 {
    50.0
}

fn default_weight() -> f64 {
    1.0
}

/// Target personality/cognitive profile for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    /// Unique identifier (e.g. "sales-hunter").
    pub id: String,
    /// Human-readable title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Target per dimension.
    #[serde(default)]
    pub target_profile: BTreeMap<Dimension, TargetSpec>,
}
