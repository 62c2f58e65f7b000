use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use common::types::Message;
use models::activity::{ActivityPatch, NewActivity};
use service::activity::{ActivityDto, ListOptions};
use service::pagination::Paginated;

use crate::{errors::JsonApiError, state::ServerState};

/// List query string. `size`, `titulo`, `ordenar` and `direcao` are accepted as aliases.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 5, max 100); alias `size`
    #[serde(alias = "size")]
    pub limit: Option<u64>,
    /// Case-insensitive substring of the title; alias `titulo`
    #[serde(alias = "titulo")]
    pub title: Option<String>,
    /// Sort field: title, description or timestamp; alias `ordenar`
    #[serde(alias = "ordenar")]
    pub sort: Option<String>,
    /// asc or desc; alias `direcao`
    #[serde(alias = "direcao")]
    pub order: Option<String>,
}

impl From<ListQuery> for ListOptions {
    fn from(q: ListQuery) -> Self {
        ListOptions { page: q.page, limit: q.limit, title: q.title, sort: q.sort, order: q.order }
    }
}

#[utoipa::path(
    post, path = "/atividades", tag = "activities",
    request_body = crate::openapi::NewActivityDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ActivityDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Create Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<NewActivity>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityDto>), JsonApiError> {
    let Json(input) = body?;
    let created = state.activities.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/atividades", tag = "activities",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK", body = crate::openapi::ActivityPageDoc),
        (status = 400, description = "Invalid Query", body = crate::openapi::ErrorDoc),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Paginated<ActivityDto>>, JsonApiError> {
    let Query(q) = query?;
    let page = state.activities.list(q.into()).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/atividades/{id}", tag = "activities",
    params(("id" = String, Path, description = "Activity ID (UUID)")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ActivityDoc),
        (status = 400, description = "Malformed ID", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ActivityDto>, JsonApiError> {
    Ok(Json(state.activities.get(&id).await?))
}

#[utoipa::path(
    put, path = "/atividades/{id}", tag = "activities",
    params(("id" = String, Path, description = "Activity ID (UUID)")),
    request_body = crate::openapi::ActivityPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ActivityDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Update Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<ActivityPatch>, JsonRejection>,
) -> Result<Json<ActivityDto>, JsonApiError> {
    let Json(patch) = body?;
    Ok(Json(state.activities.update(&id, patch).await?))
}

#[utoipa::path(
    delete, path = "/atividades/{id}", tag = "activities",
    params(("id" = String, Path, description = "Activity ID (UUID)")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 400, description = "Malformed ID", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Message>, JsonApiError> {
    state.activities.delete(&id).await?;
    info!(id = %id, "delete request served");
    Ok(Json(Message::new("activity removed")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_accepts_both_naming_schemes() {
        let q: ListQuery = parse_query("page=2&size=10&titulo=abc&ordenar=data&direcao=desc");
        assert_eq!(q.page, Some(2));
        assert_eq!(q.limit, Some(10));
        assert_eq!(q.title.as_deref(), Some("abc"));
        assert_eq!(q.sort.as_deref(), Some("data"));
        assert_eq!(q.order.as_deref(), Some("desc"));

        let q: ListQuery = parse_query("limit=3&title=x&sort=title&order=asc");
        let opts = ListOptions::from(q);
        assert_eq!(opts.limit, Some(3));
        assert_eq!(opts.sort.as_deref(), Some("title"));
    }

    fn parse_query(qs: &str) -> ListQuery {
        let uri: axum::http::Uri = format!("/atividades?{qs}").parse().unwrap();
        let Query(q) = Query::<ListQuery>::try_from_uri(&uri).unwrap();
        q
    }
}
