use chrono::{DateTime, Utc};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ActivityDoc {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// `titulo`, `descricao` and `data` are accepted as aliases.
#[derive(ToSchema)]
pub struct NewActivityDoc {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to the creation time
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(ToSchema)]
pub struct ActivityPatchDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(ToSchema)]
pub struct ActivityPageDoc {
    pub data: Vec<ActivityDoc>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub message: Option<String>,
    pub fields: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::activities::create,
        crate::routes::activities::list,
        crate::routes::activities::get,
        crate::routes::activities::update,
        crate::routes::activities::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ActivityDoc,
            NewActivityDoc,
            ActivityPatchDoc,
            ActivityPageDoc,
            ErrorDoc,
            MessageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "activities", description = "Activity CRUD")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in ["/", "/health", "/atividades", "/atividades/{id}"] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
