use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_search_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_search::catalog::JobCatalog;
use job_search::config::AppConfig;
use job_search::error::AppError;
use job_search::search::budget::install_global_parser;
use job_search::search::JobSearchService;
use job_search::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(catalog) = args.catalog.take() {
        config.catalog.path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let capacity = config.search.budget_cache_capacity.get();
    if !install_global_parser(capacity) {
        warn!(capacity, "budget cache already initialized; keeping existing capacity");
    }

    let catalog = match &config.catalog.path {
        Some(path) => JobCatalog::from_path(path)?,
        None => {
            warn!("no JOB_CATALOG_PATH configured; serving an empty catalog");
            JobCatalog::default()
        }
    };

    let job_count = catalog.len();
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog_jobs: job_count,
    };

    let service = Arc::new(JobSearchService::new(catalog));

    let app = with_search_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        jobs = job_count,
        "job search service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
