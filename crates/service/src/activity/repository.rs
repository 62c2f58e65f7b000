use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::activity::{self, ActivityDraft, ActivityPatch};

use super::query::ActivityQuery;
use crate::errors::ServiceError;

/// Persistence seam for activities.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Store a validated draft; the repository assigns the id.
    async fn insert(&self, draft: ActivityDraft) -> Result<activity::Model, ServiceError>;
    /// One page of matching rows, sorted.
    async fn find_many(&self, query: &ActivityQuery) -> Result<Vec<activity::Model>, ServiceError>;
    /// Number of rows matching the title filter, ignoring pagination.
    async fn count(&self, title: Option<&str>) -> Result<u64, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<activity::Model>, ServiceError>;
    /// `Ok(None)` when no row has this id.
    async fn update(&self, id: Uuid, patch: &ActivityPatch) -> Result<Option<activity::Model>, ServiceError>;
    /// `Ok(false)` when no row has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmActivityRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmActivityRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ActivityRepository for SeaOrmActivityRepository {
    async fn insert(&self, draft: ActivityDraft) -> Result<activity::Model, ServiceError> {
        crate::db::activity_queries::create_activity(&self.db, draft).await
    }

    async fn find_many(&self, query: &ActivityQuery) -> Result<Vec<activity::Model>, ServiceError> {
        crate::db::activity_queries::list_activities(&self.db, query).await
    }

    async fn count(&self, title: Option<&str>) -> Result<u64, ServiceError> {
        crate::db::activity_queries::count_activities(&self.db, title).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<activity::Model>, ServiceError> {
        crate::db::activity_queries::get_activity(&self.db, id).await
    }

    async fn update(&self, id: Uuid, patch: &ActivityPatch) -> Result<Option<activity::Model>, ServiceError> {
        crate::db::activity_queries::update_activity(&self.db, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        crate::db::activity_queries::delete_activity(&self.db, id).await
    }
}
