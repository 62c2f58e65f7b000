use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::activity::{ActivityPatch, NewActivity};

use super::dto::ActivityDto;
use super::memory::InMemoryActivityRepository;
use super::query::{ActivityQuery, ListOptions};
use super::repository::ActivityRepository;
use crate::errors::ServiceError;
use crate::pagination::Paginated;

/// Parse an externally supplied id. A malformed id is a distinct error from
/// a well-formed id that matches nothing.
pub fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::InvalidId(raw.to_string()))
}

/// Application service for activities. Validation happens here, before any
/// repository call; each operation performs a single repository operation
/// (list adds the matching count).
pub struct ActivityService<R: ?Sized = dyn ActivityRepository> {
    repo: Arc<R>,
}

impl<R: ?Sized> Clone for ActivityService<R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo) }
    }
}

impl ActivityService {
    pub fn from_repo(repo: impl ActivityRepository + 'static) -> Self {
        Self::new(Arc::new(repo))
    }

    pub fn in_memory() -> Self {
        Self::from_repo(InMemoryActivityRepository::new())
    }
}

impl<R: ActivityRepository + ?Sized> ActivityService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewActivity) -> Result<ActivityDto, ServiceError> {
        let draft = input.validate()?;
        let created = self.repo.insert(draft).await?;
        info!(id = %created.id, "activity_created");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, options: ListOptions) -> Result<Paginated<ActivityDto>, ServiceError> {
        let query = ActivityQuery::try_from(options)?;
        let rows = self.repo.find_many(&query).await?;
        let total = self.repo.count(query.title.as_deref()).await?;
        info!(count = rows.len(), total, page = query.pagination.page, "activities_listed");
        Ok(Paginated::new(
            rows.into_iter().map(ActivityDto::from).collect(),
            total,
            query.pagination,
        ))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, raw_id: &str) -> Result<ActivityDto, ServiceError> {
        let id = parse_id(raw_id)?;
        self.repo
            .find_by_id(id)
            .await?
            .map(ActivityDto::from)
            .ok_or_else(|| ServiceError::not_found("activity"))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, raw_id: &str, patch: ActivityPatch) -> Result<ActivityDto, ServiceError> {
        let id = parse_id(raw_id)?;
        patch.validate()?;
        let updated = self
            .repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("activity"))?;
        info!(id = %updated.id, "activity_updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<(), ServiceError> {
        let id = parse_id(raw_id)?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("activity"));
        }
        info!(id = %id, "activity_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::SeaOrmActivityRepository;
    use crate::test_support::get_db;
    use chrono::{Duration, TimeZone, Utc};

    fn new(title: &str) -> NewActivity {
        NewActivity { title: Some(title.into()), ..Default::default() }
    }

    async fn services() -> Result<Vec<ActivityService>, anyhow::Error> {
        let db = get_db().await?;
        Ok(vec![
            ActivityService::in_memory(),
            ActivityService::from_repo(SeaOrmActivityRepository::new(db)),
        ])
    }

    #[test]
    fn parse_id_distinguishes_malformed_ids() {
        assert!(matches!(parse_id("not-a-uuid"), Err(ServiceError::InvalidId(_))));
        assert!(matches!(parse_id("507f1f77bcf86cd799439011"), Err(ServiceError::InvalidId(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() -> Result<(), anyhow::Error> {
        for svc in services().await? {
            let created = svc
                .create(NewActivity { description: Some("30 min".into()), ..new("Run") })
                .await?;
            assert_eq!(created.title, "Run");
            let fetched = svc.get(&created.id.to_string()).await?;
            assert_eq!(fetched, created);
        }
        Ok(())
    }

    #[tokio::test]
    async fn create_without_title_is_a_validation_error() -> Result<(), anyhow::Error> {
        for svc in services().await? {
            let err = svc.create(NewActivity::default()).await.unwrap_err();
            match err {
                ServiceError::Validation(v) => assert_eq!(v.fields, vec!["title".to_string()]),
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(svc.list(ListOptions::default()).await?.total, 0);
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() -> Result<(), anyhow::Error> {
        for svc in services().await? {
            let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
            let created = svc
                .create(NewActivity { description: Some("keep me".into()), timestamp: Some(ts), ..new("Old") })
                .await?;
            let id = created.id.to_string();

            let updated = svc.update(&id, ActivityPatch { title: Some("New".into()), ..Default::default() }).await?;
            assert_eq!(updated.id, created.id);
            assert_eq!(updated.title, "New");
            assert_eq!(updated.description.as_deref(), Some("keep me"));
            assert_eq!(updated.timestamp, ts);

            let unchanged = svc.update(&id, ActivityPatch::default()).await?;
            assert_eq!(unchanged, updated);

            let err = svc.update(&id, ActivityPatch { title: Some(" ".into()), ..Default::default() }).await;
            assert!(matches!(err, Err(ServiceError::Validation(_))));

            let missing = svc.update(&Uuid::new_v4().to_string(), ActivityPatch::default()).await;
            assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        }
        Ok(())
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() -> Result<(), anyhow::Error> {
        for svc in services().await? {
            let created = svc.create(new("Once")).await?;
            let id = created.id.to_string();
            svc.delete(&id).await?;
            assert!(matches!(svc.delete(&id).await, Err(ServiceError::NotFound(_))));
            assert!(matches!(svc.get(&id).await, Err(ServiceError::NotFound(_))));
            assert!(matches!(svc.delete("garbage").await, Err(ServiceError::InvalidId(_))));
        }
        Ok(())
    }

    #[tokio::test]
    async fn list_paginates_filters_and_sorts() -> Result<(), anyhow::Error> {
        for svc in services().await? {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            for i in 0..12 {
                let title = if i % 3 == 0 { format!("Gym #{i}") } else { format!("study {i}") };
                svc.create(NewActivity { timestamp: Some(base + Duration::hours(i)), ..new(&title) }).await?;
            }

            let first = svc.list(ListOptions::default()).await?;
            assert_eq!(first.data.len(), 5);
            assert_eq!(first.total, 12);
            assert_eq!(first.total_pages, 3);
            assert_eq!(first.data[0].timestamp, base + Duration::hours(11));
            assert!(first.data.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

            let last = svc.list(ListOptions { page: Some(3), ..Default::default() }).await?;
            assert_eq!(last.data.len(), 2);

            let gym = svc.list(ListOptions { title: Some("GYM".into()), ..Default::default() }).await?;
            assert_eq!(gym.total, 4);
            assert_eq!(gym.total_pages, 1);
            assert!(gym.data.iter().all(|a| a.title.to_lowercase().contains("gym")));

            let asc = svc
                .list(ListOptions { sort: Some("data".into()), order: Some("asc".into()), limit: Some(3), ..Default::default() })
                .await?;
            assert_eq!(asc.limit, 3);
            assert_eq!(asc.data[0].timestamp, base);

            let bad = svc.list(ListOptions { order: Some("sideways".into()), ..Default::default() }).await;
            assert!(matches!(bad, Err(ServiceError::Validation(_))));

            let far = svc.list(ListOptions { page: Some(u64::MAX), ..Default::default() }).await?;
            assert!(far.data.is_empty());
            assert_eq!(far.total, 12);
        }
        Ok(())
    }
}
