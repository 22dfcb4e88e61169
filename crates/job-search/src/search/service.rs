use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::JobCatalog;

use super::cascade::RelaxationTier;
use super::domain::{AvailableOptions, FilterSelection, JobRecord, SortKey, SortOrder};
use super::orchestrator::run_pipeline;
use super::roles::normalize_selection;

/// One stateless search over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub search_term: String,
    pub filters: FilterSelection,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// Snap free-form filter values onto the catalog's options before searching.
    pub normalize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub jobs: Vec<JobRecord>,
    pub total: usize,
    pub tier: RelaxationTier,
    pub strict_count: usize,
    pub active_filter_count: usize,
    pub degraded: bool,
    pub options: AvailableOptions,
}

/// Read-only search facade over a loaded catalog.
#[derive(Debug, Clone, Default)]
pub struct JobSearchService {
    catalog: JobCatalog,
    options: AvailableOptions,
}

impl JobSearchService {
    pub fn new(catalog: JobCatalog) -> Self {
        let options = catalog.options();
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &AvailableOptions {
        &self.options
    }

    pub fn search(&self, request: &SearchRequest) -> SearchResponse {
        let filters = if request.normalize {
            normalize_selection(&request.filters, &self.options)
        } else {
            request.filters.clone()
        };

        let results = run_pipeline(
            self.catalog.jobs(),
            &request.search_term,
            &filters,
            request.sort_by,
            request.sort_order,
        );
        debug!(
            term = %request.search_term,
            total = results.jobs.len(),
            tier = results.tier.label(),
            "search served"
        );

        SearchResponse {
            total: results.jobs.len(),
            jobs: results.jobs,
            tier: results.tier,
            strict_count: results.strict_count,
            active_filter_count: filters.active_filter_count(),
            degraded: results.degraded,
            options: self.options.clone(),
        }
    }
}
