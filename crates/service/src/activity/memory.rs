use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::activity::{self, ActivityDraft, ActivityPatch};

use super::query::{title_matches, ActivityQuery};
use super::repository::ActivityRepository;
use crate::errors::ServiceError;

/// Map-backed repository for tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryActivityRepository {
    rows: RwLock<HashMap<Uuid, activity::Model>>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn insert(&self, draft: ActivityDraft) -> Result<activity::Model, ServiceError> {
        let m = draft.into_model();
        self.rows.write().await.insert(m.id, m.clone());
        Ok(m)
    }

    async fn find_many(&self, query: &ActivityQuery) -> Result<Vec<activity::Model>, ServiceError> {
        let rows = self.rows.read().await;
        let mut hits: Vec<activity::Model> = rows.values().filter(|m| query.matches(m)).cloned().collect();
        hits.sort_by(|a, b| query.sort.compare(a, b));
        let skip = usize::try_from(query.pagination.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.pagination.per_page).unwrap_or(usize::MAX);
        Ok(hits.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self, title: Option<&str>) -> Result<u64, ServiceError> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|m| title_matches(title, m)).count() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<activity::Model>, ServiceError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, patch: &ActivityPatch) -> Result<Option<activity::Model>, ServiceError> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|m| {
            patch.apply(m);
            m.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}
