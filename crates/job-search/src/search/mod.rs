//! Job search pipeline: text matching, structured filters, progressive
//! relaxation, ranking and option extraction, plus the HTTP surface over it.

pub mod budget;
pub mod cascade;
pub mod domain;
pub mod filters;
pub mod options;
pub mod orchestrator;
pub mod ranker;
pub mod roles;
pub mod router;
pub mod service;
pub mod text;

pub use budget::{parse_budget, BudgetCacheStats, BudgetParser};
pub use cascade::{search, search_with_outcome, RelaxationTier, SearchOutcome};
pub use domain::{
    AvailableOptions, BudgetRange, FilterDimension, FilterSelection, JobRecord, SelectionError,
    SortKey, SortOrder,
};
pub use filters::matches_filters;
pub use options::extract_options;
pub use orchestrator::{run_pipeline, DebounceState, QueryOrchestrator, SearchResults};
pub use ranker::sort_jobs;
pub use roles::{find_best_role_match, normalize_selection};
pub use router::search_router;
pub use service::{JobSearchService, SearchRequest, SearchResponse};
pub use text::matches_search_term;

#[cfg(test)]
mod tests;
