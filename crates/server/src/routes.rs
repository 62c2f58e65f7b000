use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, routing::get, BoxError, Json, Router};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{errors::JsonApiError, openapi::ApiDoc, state::ServerState};

pub mod activities;

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Liveness message", body = String)))]
pub async fn root() -> &'static str {
    "Servidor online"
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Turns middleware failures into the usual JSON error body.
async fn handle_middleware_error(err: BoxError) -> JsonApiError {
    if err.is::<Elapsed>() {
        JsonApiError::new(
            StatusCode::REQUEST_TIMEOUT,
            "Request Timeout",
            Some("request took too long to complete".into()),
        )
    } else {
        JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(err.to_string()))
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: liveness, activity CRUD and the OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let api = Router::new()
        .route("/atividades", get(activities::list).post(activities::create))
        .route(
            "/atividades/:id",
            get(activities::get).put(activities::update).delete(activities::delete),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
        // 超时返回 408，错误体与其他错误一致（JSON）
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每个请求一个 span（方法、路径），不记录请求头
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应时记录状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx 以 ERROR 级别记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
