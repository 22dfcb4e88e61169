use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use super::service::{JobSearchService, SearchRequest};

/// Router exposing catalog options and search.
pub fn search_router(service: Arc<JobSearchService>) -> Router {
    Router::new()
        .route("/api/v1/jobs/options", get(options_handler))
        .route("/api/v1/jobs/search", post(search_handler))
        .with_state(service)
}

pub(crate) async fn options_handler(State(service): State<Arc<JobSearchService>>) -> Response {
    (StatusCode::OK, axum::Json(service.options().clone())).into_response()
}

pub(crate) async fn search_handler(
    State(service): State<Arc<JobSearchService>>,
    axum::Json(request): axum::Json<SearchRequest>,
) -> Response {
    let response = service.search(&request);
    (StatusCode::OK, axum::Json(response)).into_response()
}
