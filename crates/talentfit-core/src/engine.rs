//! Central assessment engine.
//!
//! Coordinates the item catalog, session state machine, selector, scorer,
//! profile finalizer and fit evaluator over a set of injected repositories.
//!
//! Every mutation of a session (submit, finalize, abandon) runs under that
//! session's own async lock, so the read-modify-write of the running estimate
//! never races another submission for the same session. A lock lives in the
//! engine only while some operation on its session is running or waiting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures::future::try_join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::dataset::ItemRecord;
use crate::error::{AssessmentError, EntityKind};
use crate::language::TextAnalysis;
use crate::matchmaker::{evaluate_fit, FitResult};
use crate::model::{
    CandidateId, CandidateProfile, CefrLevel, Item, ItemId, JobProfile, Response, Session,
    SessionId,
};
use crate::profile::{build_profile, ProfileInputs};
use crate::scoring::{theta_from_scored, validate_likert};
use crate::selector::select_next_item;
use crate::traits::Repositories;

/// Configuration for the assessment engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Seed for item selection; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// CEFR band used when no language analysis is supplied.
    pub default_cefr: CefrLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_cefr: CefrLevel::B1,
        }
    }
}

type SessionLock = Arc<tokio::sync::Mutex<()>>;
type SessionLocks = Mutex<HashMap<SessionId, SessionLock>>;

/// Held for the duration of one session mutation.
///
/// Dropping it releases the session lock and forgets the lock entirely once
/// no other task holds or awaits it.
struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    id: SessionId,
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under this mutex, so a count of one means
        // the map holds the last reference.
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

/// The central assessment engine.
pub struct AssessmentEngine {
    repos: Repositories,
    config: EngineConfig,
    rng: Mutex<StdRng>,
    session_locks: SessionLocks,
}

impl AssessmentEngine {
    pub fn new(repos: Repositories, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            repos,
            config,
            rng: Mutex::new(rng),
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Number of sessions with a mutation currently running or waiting.
    pub fn active_session_locks(&self) -> usize {
        self.session_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn lock_session(&self, id: SessionId) -> SessionGuard<'_> {
        let lock = {
            let mut locks = self
                .session_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id).or_default())
        };
        let mut guard = SessionGuard {
            locks: &self.session_locks,
            id,
            guard: None,
        };
        guard.guard = Some(lock.lock_owned().await);
        guard
    }

    async fn require_session(&self, id: SessionId) -> Result<Session, AssessmentError> {
        self.repos
            .sessions
            .get(id)
            .await?
            .ok_or_else(|| AssessmentError::not_found(EntityKind::Session, id))
    }

    /// Resolve catalog items for a batch of ids, preserving order.
    async fn resolve_items(&self, ids: &[ItemId]) -> Result<Vec<Option<Item>>, AssessmentError> {
        let items = &self.repos.items;
        Ok(try_join_all(ids.iter().map(|id| items.by_id(*id))).await?)
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Load the item catalog unless it is already populated.
    pub async fn load_items(&self, rows: &[ItemRecord]) -> Result<usize, AssessmentError> {
        let inserted = self.repos.items.load_if_empty(rows).await?;
        if inserted == 0 {
            debug!("item catalog already populated, skipping load");
        } else {
            info!(items = inserted, "loaded item catalog");
        }
        Ok(inserted)
    }

    /// Seed job profiles, skipping titles that already exist.
    ///
    /// Returns the titles that were created.
    pub async fn seed_job_profiles(
        &self,
        profiles: &[JobProfile],
    ) -> Result<Vec<String>, AssessmentError> {
        let mut created = Vec::new();
        for profile in profiles {
            crate::dataset::validate_job_profile(profile)?;
            if self.repos.jobs.seed(profile).await? {
                created.push(profile.title.clone());
            }
        }
        if !created.is_empty() {
            info!(jobs = ?created, "seeded job profiles");
        }
        Ok(created)
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Start a new in-progress session for a candidate.
    pub async fn start_session(
        &self,
        candidate_id: CandidateId,
    ) -> Result<Session, AssessmentError> {
        let session = self.repos.sessions.create(candidate_id).await?;
        info!(session = %session.id, candidate_id, "started session");
        Ok(session)
    }

    /// Advise the next item to present, or `None` when every item is answered.
    pub async fn next_item(&self, session_id: SessionId) -> Result<Option<Item>, AssessmentError> {
        let session = self.require_session(session_id).await?;
        let catalog = self.repos.items.all().await?;
        let answered = session.answered_items();

        let next = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select_next_item(&catalog, &answered, &mut *rng)
        };

        match &next {
            Some(item) => debug!(
                session = %session_id,
                item = item.id,
                validity = item.is_validity_check,
                "selected next item"
            ),
            None => debug!(session = %session_id, "no items remaining"),
        }
        Ok(next)
    }

    /// Record a response and update the running estimate for the item's trait.
    ///
    /// Returns `Ok(false)` if the session or item does not exist. A raw value
    /// outside 1..=5 is a `Validation` error; a terminal session or an item
    /// answered earlier in this session is an `InvalidState` error.
    pub async fn submit(
        &self,
        session_id: SessionId,
        item_id: ItemId,
        value: u8,
        latency_ms: u64,
    ) -> Result<bool, AssessmentError> {
        let value = validate_likert(value)?;

        let _guard = self.lock_session(session_id).await;

        let Some(mut session) = self.repos.sessions.get(session_id).await? else {
            warn!(session = %session_id, "submit for unknown session");
            return Ok(false);
        };
        let Some(item) = self.repos.items.by_id(item_id).await? else {
            warn!(session = %session_id, item = item_id, "submit for unknown item");
            return Ok(false);
        };

        session.ensure_in_progress()?;

        // Recompute from every response to this trait, not incrementally.
        let prior_ids: Vec<ItemId> = session.responses.iter().map(|r| r.item_id).collect();
        let prior_items = self.resolve_items(&prior_ids).await?;
        let mut scored: Vec<u8> = session
            .responses
            .iter()
            .zip(prior_items)
            .filter_map(|(response, prior)| {
                prior
                    .filter(|p| p.scale == item.scale)
                    .map(|p| p.keyed.apply(response.value))
            })
            .collect();
        scored.push(item.keyed.apply(value));
        let theta = theta_from_scored(&scored).unwrap_or_default();

        let response = Response {
            session_id,
            item_id,
            value,
            latency_ms,
            recorded_at: Utc::now(),
        };
        session.record_response(response.clone(), item.scale, theta)?;

        // Session before log: every logged response must be on the session.
        self.repos.sessions.save(&session).await?;
        self.repos.responses.append(&response).await?;

        debug!(
            session = %session_id,
            item = item_id,
            scale = %item.scale,
            theta,
            "recorded response"
        );
        Ok(true)
    }

    /// The session's responses in submission order, each with its item.
    ///
    /// Responses whose item has left the catalog are skipped.
    pub async fn session_responses(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<(Response, Item)>, AssessmentError> {
        self.require_session(session_id).await?;
        let responses = self.repos.responses.for_session(session_id).await?;
        let ids: Vec<ItemId> = responses.iter().map(|r| r.item_id).collect();
        let items = self.resolve_items(&ids).await?;

        Ok(responses
            .into_iter()
            .zip(items)
            .filter_map(|(response, item)| match item {
                Some(item) => Some((response, item)),
                None => {
                    warn!(item = response.item_id, "response references missing item");
                    None
                }
            })
            .collect())
    }

    /// Finalize the session into a candidate profile and mark it completed.
    pub async fn finalize(
        &self,
        session_id: SessionId,
        cognitive_score: u8,
        language: Option<&TextAnalysis>,
    ) -> Result<CandidateProfile, AssessmentError> {
        let _guard = self.lock_session(session_id).await;

        let mut session = self.require_session(session_id).await?;
        session.ensure_in_progress()?;

        let responses = self.session_responses(session_id).await?;
        let now = Utc::now();
        let profile = build_profile(ProfileInputs {
            candidate_id: session.candidate_id,
            session_id,
            responses: &responses,
            cognitive_score,
            english_level: language
                .map(|l| l.estimated_cefr)
                .unwrap_or(self.config.default_cefr),
            created_at: now,
        })?;

        self.repos.profiles.save(&profile).await?;
        session.complete(now)?;
        self.repos.sessions.save(&session).await?;

        info!(
            session = %session_id,
            candidate_id = session.candidate_id,
            profile = %profile.id,
            responses = responses.len(),
            "finalized candidate profile"
        );
        Ok(profile)
    }

    /// Mark an in-progress session as abandoned.
    pub async fn abandon(&self, session_id: SessionId) -> Result<Session, AssessmentError> {
        let _guard = self.lock_session(session_id).await;

        let mut session = self.require_session(session_id).await?;
        session.abandon(Utc::now())?;
        self.repos.sessions.save(&session).await?;
        info!(session = %session_id, "abandoned session");
        Ok(session)
    }

    // -----------------------------------------------------------------------
    // Matching
    // -----------------------------------------------------------------------

    /// Compare the candidate's latest profile against a job profile.
    pub async fn calculate_fit(
        &self,
        candidate_id: CandidateId,
        job_id: &str,
    ) -> Result<FitResult, AssessmentError> {
        let profile = self
            .repos
            .profiles
            .latest_for_candidate(candidate_id)
            .await?
            .ok_or_else(|| AssessmentError::not_found(EntityKind::CandidateProfile, candidate_id))?;
        let job = self
            .repos
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| AssessmentError::not_found(EntityKind::JobProfile, job_id))?;

        let fit = evaluate_fit(&profile, &job);
        info!(
            candidate_id,
            job = %job.id,
            fit = fit.fit_score,
            recommendation = %fit.recommendation,
            "calculated fit"
        );
        Ok(fit)
    }
}
