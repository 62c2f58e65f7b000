use sea_orm::sea_query::{Expr, LikeExpr, NullOrdering, Order};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use models::activity::{self, ActivityDraft, ActivityPatch, Entity as ActivityEntity};

use crate::activity::query::{ActivityQuery, SortDirection, SortField};
use crate::errors::ServiceError;

/// Escape LIKE wildcards so the search text matches literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `title_search LIKE '%needle%'` with the needle folded the same way as the
/// stored column, so matching does not depend on the backend's case rules.
fn filtered(title: Option<&str>) -> Select<ActivityEntity> {
    let finder = ActivityEntity::find();
    match title {
        Some(needle) => {
            let pattern = format!("%{}%", escape_like(&activity::fold_title(needle)));
            finder.filter(
                Expr::col((ActivityEntity, activity::Column::TitleSearch))
                    .like(LikeExpr::new(pattern).escape('\\')),
            )
        }
        None => finder,
    }
}

fn sort_column(field: SortField) -> activity::Column {
    match field {
        SortField::Title => activity::Column::Title,
        SortField::Description => activity::Column::Description,
        SortField::Timestamp => activity::Column::Timestamp,
    }
}

/// One page of activities matching the query.
pub async fn list_activities(db: &DatabaseConnection, query: &ActivityQuery) -> Result<Vec<activity::Model>, ServiceError> {
    let finder = filtered(query.title.as_deref());
    let col = sort_column(query.sort.field);
    let order = match query.sort.direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    };
    // Postgres defaults to NULLS LAST on asc and SQLite to NULLS FIRST; pin it.
    let finder = finder.order_by_with_nulls(col, order, NullOrdering::Last);
    let rows = finder
        .order_by_asc(activity::Column::Id)
        .offset(query.pagination.offset())
        .limit(query.pagination.per_page)
        .all(db)
        .await?;
    Ok(rows)
}

/// Count activities matching the title filter.
pub async fn count_activities(db: &DatabaseConnection, title: Option<&str>) -> Result<u64, ServiceError> {
    Ok(filtered(title).count(db).await?)
}

/// Insert a validated draft.
pub async fn create_activity(db: &DatabaseConnection, draft: ActivityDraft) -> Result<activity::Model, ServiceError> {
    let created = activity::create(db, draft).await?;
    Ok(created)
}

/// Get an activity by id.
pub async fn get_activity(db: &DatabaseConnection, id: Uuid) -> Result<Option<activity::Model>, ServiceError> {
    let found = ActivityEntity::find_by_id(id).one(db).await?;
    Ok(found)
}

/// Apply the supplied fields; `None` when the id does not exist.
pub async fn update_activity(
    db: &DatabaseConnection,
    id: Uuid,
    patch: &ActivityPatch,
) -> Result<Option<activity::Model>, ServiceError> {
    let Some(existing) = ActivityEntity::find_by_id(id).one(db).await? else { return Ok(None); };
    if patch.is_empty() {
        return Ok(Some(existing));
    }
    let mut am: activity::ActiveModel = existing.into();
    patch.apply_active(&mut am);
    match am.update(db).await {
        Ok(updated) => Ok(Some(updated)),
        // deleted between the read and the write
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete an activity; returns true if a row was removed.
pub async fn delete_activity(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = ActivityEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
