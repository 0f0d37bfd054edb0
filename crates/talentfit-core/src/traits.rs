//! Core trait definitions for persistence and external analysis services.
//!
//! These async traits are implemented by `talentfit-store` (in-memory) and by
//! any durable back end. The engine only ever talks to them through
//! [`Repositories`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::dataset::ItemRecord;
use crate::language::TextAnalysis;
use crate::model::{
    CandidateId, CandidateProfile, Item, ItemId, JobProfile, Response, Session, SessionId,
};

// ---------------------------------------------------------------------------
// Item catalog
// ---------------------------------------------------------------------------

/// Read-only catalog of assessment items.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Populate the catalog from dataset rows unless it already holds items.
    ///
    /// Returns the number of items inserted (0 when the load was skipped).
    /// Concurrent first callers must not create duplicate rows.
    async fn load_if_empty(&self, rows: &[ItemRecord]) -> anyhow::Result<usize>;

    /// All catalog items in id order.
    async fn all(&self) -> anyhow::Result<Vec<Item>>;

    async fn by_id(&self, id: ItemId) -> anyhow::Result<Option<Item>>;
}

// ---------------------------------------------------------------------------
// Sessions and responses
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create and persist a new in-progress session.
    async fn create(&self, candidate_id: CandidateId) -> anyhow::Result<Session>;

    async fn get(&self, id: SessionId) -> anyhow::Result<Option<Session>>;

    /// Persist the full session state.
    async fn save(&self, session: &Session) -> anyhow::Result<()>;
}

/// Append-only log of submitted responses.
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn append(&self, response: &Response) -> anyhow::Result<()>;

    /// Responses for a session in submission order.
    async fn for_session(&self, session_id: SessionId) -> anyhow::Result<Vec<Response>>;
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The candidate's most recently created profile.
    async fn latest_for_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> anyhow::Result<Option<CandidateProfile>>;

    async fn save(&self, profile: &CandidateProfile) -> anyhow::Result<()>;
}

#[async_trait]
pub trait JobProfileRepository: Send + Sync {
    async fn get(&self, id: &str) -> anyhow::Result<Option<JobProfile>>;

    async fn all(&self) -> anyhow::Result<Vec<JobProfile>>;

    /// Insert `profile` unless a job with the same title exists.
    ///
    /// Returns `true` if it was inserted.
    async fn seed(&self, profile: &JobProfile) -> anyhow::Result<bool>;
}

/// The full set of repositories the engine depends on.
#[derive(Clone)]
pub struct Repositories {
    pub items: Arc<dyn ItemStore>,
    pub sessions: Arc<dyn SessionRepository>,
    pub responses: Arc<dyn ResponseRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub jobs: Arc<dyn JobProfileRepository>,
}

// ---------------------------------------------------------------------------
// Language analysis
// ---------------------------------------------------------------------------

/// External service estimating language proficiency from a transcript.
#[async_trait]
pub trait LanguageAnalyzer: Send + Sync {
    /// Human-readable analyzer name (e.g. "lexical").
    fn name(&self) -> &str;

    async fn analyze_text(&self, text: &str) -> anyhow::Result<TextAnalysis>;
}
