use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::JobCatalog;
use crate::search::domain::{parse_timestamp, JobRecord};
use crate::search::service::JobSearchService;

pub(super) fn posting(id: &str, title: &str, employment_type: &str, budget: &str) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        title: title.to_string(),
        employment_type: employment_type.to_string(),
        location_type: "remote".to_string(),
        country: "United States".to_string(),
        budget: Some(budget.to_string()),
        ..JobRecord::default()
    }
}

/// Small catalog with distinct creation dates so the default sort is deterministic.
pub(super) fn catalog() -> JobCatalog {
    let mut react = posting("1", "React Developer", "full-time", "90k");
    react.required_skills = "react, typescript".to_string();
    react.created_at = parse_timestamp("2025-02-01");

    let mut designer = posting("2", "Graphic Designer", "contract", "2500");
    designer.created_at = parse_timestamp("2025-03-01");

    let mut backend = posting("3", "Backend Engineer", "part-time", "60");
    backend.description = "Node and Postgres services".to_string();
    backend.location_type = "hybrid".to_string();
    backend.created_at = parse_timestamp("2025-01-01");
    backend.pending_application_count = 4;

    JobCatalog::new(vec![react, designer, backend])
}

pub(super) fn service() -> Arc<JobSearchService> {
    Arc::new(JobSearchService::new(catalog()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn ids(payload: &Value) -> Vec<String> {
    payload["jobs"]
        .as_array()
        .expect("jobs array")
        .iter()
        .filter_map(|job| job["id"].as_str().map(str::to_string))
        .collect()
}
