use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use job_search::search::{search_router, JobSearchService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_search_routes(service: Arc<JobSearchService>) -> axum::Router {
    search_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "jobs": state.catalog_jobs })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use job_search::catalog::JobCatalog;
    use job_search::search::domain::JobRecord;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(handle),
            catalog_jobs: 2,
        }
    }

    fn service() -> Arc<JobSearchService> {
        let jobs = vec![
            JobRecord {
                id: "1".to_string(),
                title: "React Developer".to_string(),
                employment_type: "full-time".to_string(),
                budget: Some("90k".to_string()),
                ..JobRecord::default()
            },
            JobRecord {
                id: "2".to_string(),
                title: "Graphic Designer".to_string(),
                employment_type: "contract".to_string(),
                budget: Some("2500".to_string()),
                ..JobRecord::default()
            },
        ];
        Arc::new(JobSearchService::new(JobCatalog::new(jobs)))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_tracks_the_startup_flag() {
        let state = state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["jobs"], json!(2));
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let response = metrics_endpoint(Extension(state(true))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(b"text/plain; version=0.0.4".as_slice())
        );
    }

    #[tokio::test]
    async fn search_scenario_through_the_full_router() {
        let app = with_search_routes(service()).layer(Extension(state(true)));

        let request = |filters: serde_json::Value| {
            Request::post("/api/v1/jobs/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({ "searchTerm": "react", "filters": filters }))
                        .unwrap(),
                ))
                .unwrap()
        };

        let response = app.clone().oneshot(request(json!({}))).await.unwrap();
        let payload = json_body(response).await;
        assert_eq!(payload["total"], json!(1));
        assert_eq!(payload["jobs"][0]["id"], json!("1"));

        let response = app
            .oneshot(request(json!({ "employmentType": "contract" })))
            .await
            .unwrap();
        let payload = json_body(response).await;
        assert_eq!(payload["jobs"], json!([]));
        assert_eq!(payload["activeFilterCount"], json!(1));
    }

    #[tokio::test]
    async fn health_route_is_mounted_next_to_search() {
        let app = with_search_routes(service()).layer(Extension(state(true)));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
