use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use tracing::error;

/// Error returned by handlers, rendered as
/// `{"error": ..., "message": ..., "fields": [...]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, message: Option<String>) -> Self {
        Self { status, error: error.to_string(), message, fields: Vec::new() }
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, message = ?self.message, "request failed");
        }
        let body = ErrorBody { error: self.error, message: self.message, fields: self.fields };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(v.message)).with_fields(v.fields)
            }
            ServiceError::InvalidId(raw) => JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Invalid Id",
                Some(format!("malformed activity id: {raw:?}")),
            ),
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Db(detail) => {
                // driver text stays in the log, never in the response
                error!(error = %detail, "database operation failed");
                JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    Some("the request could not be completed".into()),
                )
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Body", Some(r.body_text()))
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Query", Some(r.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ValidationError;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation(ValidationError::missing(&["title"])), StatusCode::BAD_REQUEST),
            (ServiceError::InvalidId("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("activity"), StatusCode::NOT_FOUND),
            (ServiceError::Db("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn database_detail_is_not_echoed() {
        let detail = "error returned from database: relation \"activity\" does not exist";
        let e = JsonApiError::from(ServiceError::Db(detail.into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = e.message.unwrap_or_default();
        assert!(!message.contains("relation"));
        assert!(!message.is_empty());
    }

    #[test]
    fn validation_error_keeps_field_list() {
        let e = JsonApiError::from(ServiceError::Validation(ValidationError::missing(&["title"])));
        assert_eq!(e.fields, vec!["title".to_string()]);
        assert_eq!(e.error, "Validation Error");
    }
}
