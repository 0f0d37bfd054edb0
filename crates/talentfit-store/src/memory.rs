//! In-memory repositories.
//!
//! Stores everything behind tokio `RwLock`s without persistence. Used as the
//! default store for the CLI and as the test double for the engine.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use talentfit_core::dataset::ItemRecord;
use talentfit_core::model::{
    CandidateId, CandidateProfile, Item, ItemId, JobProfile, Response, Session, SessionId,
};
use talentfit_core::traits::{
    ItemStore, JobProfileRepository, ProfileRepository, Repositories, ResponseRepository,
    SessionRepository,
};

use crate::error::StoreError;

/// In-memory implementation of every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<Item>>,
    sessions: RwLock<HashMap<SessionId, Session>>,
    responses: RwLock<HashMap<SessionId, Vec<Response>>>,
    profiles: RwLock<Vec<CandidateProfile>>,
    /// Insertion order is preserved for listing.
    jobs: RwLock<Vec<JobProfile>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose this store through every repository port.
    pub fn repositories(self: Arc<Self>) -> Repositories {
        Repositories {
            items: self.clone(),
            sessions: self.clone(),
            responses: self.clone(),
            profiles: self.clone(),
            jobs: self,
        }
    }

    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn load_if_empty(&self, rows: &[ItemRecord]) -> anyhow::Result<usize> {
        // The emptiness check and the insert share one write guard.
        let mut items = self.items.write().await;
        if !items.is_empty() {
            return Ok(0);
        }

        items.extend(rows.iter().zip(1..).map(|(row, id)| Item {
            id,
            text: row.text.clone(),
            scale: row.scale,
            keyed: row.keyed,
            is_validity_check: row.is_validity,
        }));
        debug!(count = items.len(), "populated in-memory item catalog");
        Ok(items.len())
    }

    async fn all(&self) -> anyhow::Result<Vec<Item>> {
        Ok(self.items.read().await.clone())
    }

    async fn by_id(&self, id: ItemId) -> anyhow::Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create(&self, candidate_id: CandidateId) -> anyhow::Result<Session> {
        let session = Session::start(candidate_id);
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: SessionId) -> anyhow::Result<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.id) {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            }
            None => Err(StoreError::UnknownSession(session.id).into()),
        }
    }
}

#[async_trait]
impl ResponseRepository for InMemoryStore {
    async fn append(&self, response: &Response) -> anyhow::Result<()> {
        self.responses
            .write()
            .await
            .entry(response.session_id)
            .or_default()
            .push(response.clone());
        Ok(())
    }

    async fn for_session(&self, session_id: SessionId) -> anyhow::Result<Vec<Response>> {
        Ok(self
            .responses
            .read()
            .await
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn latest_for_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> anyhow::Result<Option<CandidateProfile>> {
        let profiles = self.profiles.read().await;
        // max_by_key keeps the last of equal timestamps, i.e. the newest insert.
        Ok(profiles
            .iter()
            .filter(|p| p.candidate_id == candidate_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn save(&self, profile: &CandidateProfile) -> anyhow::Result<()> {
        self.profiles.write().await.push(profile.clone());
        Ok(())
    }
}

#[async_trait]
impl JobProfileRepository for InMemoryStore {
    async fn get(&self, id: &str) -> anyhow::Result<Option<JobProfile>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.iter().find(|job| job.id == id).cloned())
    }

    async fn all(&self) -> anyhow::Result<Vec<JobProfile>> {
        Ok(self.jobs.read().await.clone())
    }

    async fn seed(&self, profile: &JobProfile) -> anyhow::Result<bool> {
        let mut jobs = self.jobs.write().await;
        if jobs.iter().any(|job| job.title == profile.title) {
            return Ok(false);
        }
        if let Some(existing) = jobs.iter().find(|job| job.id == profile.id) {
            return Err(StoreError::JobIdConflict {
                id: profile.id.clone(),
                existing_title: existing.title.clone(),
            }
            .into());
        }
        jobs.push(profile.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, Utc};
    use talentfit_core::model::{CefrLevel, Keying, Trait};
    use uuid::Uuid;

    use super::*;

    fn rows() -> Vec<ItemRecord> {
        vec![
            ItemRecord {
                text: "Am the life of the party.".into(),
                scale: Trait::Extraversion,
                keyed: Keying::Plus,
                is_validity: false,
            },
            ItemRecord {
                text: "Have never told a lie.".into(),
                scale: Trait::Agreeableness,
                keyed: Keying::Plus,
                is_validity: true,
            },
        ]
    }

    fn job(id: &str, title: &str) -> JobProfile {
        JobProfile {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            target_profile: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn load_assigns_sequential_ids_once() {
        let store = InMemoryStore::new();
        assert_eq!(store.load_if_empty(&rows()).await.unwrap(), 2);
        assert_eq!(store.load_if_empty(&rows()).await.unwrap(), 0);

        let items = ItemStore::all(&store).await.unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(items[1].is_validity_check);
        assert_eq!(store.by_id(2).await.unwrap().unwrap().scale, Trait::Agreeableness);
        assert!(store.by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_requires_created_session() {
        let store = InMemoryStore::new();
        let session = store.create(9).await.unwrap();
        assert!(SessionRepository::save(&store, &session).await.is_ok());

        let stranger = Session::start(9);
        let err = SessionRepository::save(&store, &stranger).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::UnknownSession(id)) if *id == stranger.id
        ));
    }

    #[tokio::test]
    async fn responses_are_kept_per_session_in_order() {
        let store = InMemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        for (session_id, item_id) in [(a, 3), (b, 1), (a, 1)] {
            store
                .append(&Response {
                    session_id,
                    item_id,
                    value: 4,
                    latency_ms: 100,
                    recorded_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let ids: Vec<ItemId> = store
            .for_session(a)
            .await
            .unwrap()
            .iter()
            .map(|r| r.item_id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(store.for_session(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_profile_wins() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        for (candidate_id, offset) in [(1, 0), (1, 10), (2, 20), (1, 5)] {
            ProfileRepository::save(
                &store,
                &CandidateProfile {
                    id: Uuid::new_v4(),
                    candidate_id,
                    session_id: Uuid::new_v4(),
                    created_at: now + Duration::seconds(offset),
                    scores: BTreeMap::new(),
                    english_level: CefrLevel::B1,
                },
            )
            .await
            .unwrap();
        }

        let latest = store.latest_for_candidate(1).await.unwrap().unwrap();
        assert_eq!(latest.created_at, now + Duration::seconds(10));
        assert!(store.latest_for_candidate(3).await.unwrap().is_none());
        assert_eq!(store.profile_count().await, 4);
    }

    #[tokio::test]
    async fn seed_skips_existing_titles() {
        let store = InMemoryStore::new();
        assert!(store.seed(&job("sales", "Sales Hunter")).await.unwrap());
        assert!(!store.seed(&job("sales-2", "Sales Hunter")).await.unwrap());
        assert!(store.seed(&job("eng", "Software Engineer")).await.unwrap());

        let titles: Vec<String> = JobProfileRepository::all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["Sales Hunter", "Software Engineer"]);
        assert!(JobProfileRepository::get(&store, "eng").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn seed_rejects_reused_id() {
        let store = InMemoryStore::new();
        store.seed(&job("x", "First")).await.unwrap();
        let err = store.seed(&job("x", "Second")).await.unwrap_err();
        assert!(err.to_string().contains("already belongs to \"First\""));
    }
}
