//! Interactive front of the pipeline: debounced search term, memoized results.
//!
//! The debounce is an explicit state machine driven by caller-supplied instants:
//!
//! ```text
//! Idle --keystroke--> Pending --deadline--> Computing --> Settled
//!                       ^   |
//!                       +---+ keystroke replaces the pending timer
//! ```
//!
//! Filters and sort settings apply immediately; only the search term waits.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use super::cascade::{search_with_outcome, RelaxationTier};
use super::domain::{AvailableOptions, FilterSelection, JobRecord, SortKey, SortOrder};
use super::options::extract_options;
use super::ranker::sort_in_place;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending { term: String, deadline: Instant },
    Computing,
    Settled,
}

/// Ranked output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub jobs: Vec<JobRecord>,
    pub tier: RelaxationTier,
    pub strict_count: usize,
    /// Set when the selection was rejected and the input is returned unfiltered.
    pub degraded: bool,
}

/// Filter, relax, then rank.
///
/// A selection that fails validation is logged and the records come back
/// unfiltered and unsorted; visible results beat a correct order.
pub fn run_pipeline(
    records: &[JobRecord],
    search_term: &str,
    filters: &FilterSelection,
    sort_key: SortKey,
    sort_order: SortOrder,
) -> SearchResults {
    if let Err(error) = filters.validate() {
        warn!(%error, "search selection rejected; returning unfiltered jobs");
        return SearchResults {
            jobs: records.to_vec(),
            tier: RelaxationTier::Strict,
            strict_count: records.len(),
            degraded: true,
        };
    }

    let outcome = search_with_outcome(records, search_term, filters);
    let mut jobs = outcome.jobs;
    sort_in_place(&mut jobs, sort_key, sort_order);

    SearchResults {
        jobs,
        tier: outcome.tier,
        strict_count: outcome.strict_count,
        degraded: false,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PipelineKey {
    generation: u64,
    term: String,
    filters: FilterSelection,
    sort_key: SortKey,
    sort_order: SortOrder,
}

pub struct QueryOrchestrator {
    records: Vec<JobRecord>,
    generation: u64,
    input_term: String,
    debounced_term: String,
    filters: FilterSelection,
    sort_key: SortKey,
    sort_order: SortOrder,
    debounce: Duration,
    state: DebounceState,
    memo: Option<(PipelineKey, SearchResults)>,
    options: Option<(u64, AvailableOptions)>,
    computations: u64,
}

impl QueryOrchestrator {
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self::with_debounce(records, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(records: Vec<JobRecord>, debounce: Duration) -> Self {
        Self {
            records,
            generation: 0,
            input_term: String::new(),
            debounced_term: String::new(),
            filters: FilterSelection::default(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            debounce,
            state: DebounceState::Idle,
            memo: None,
            options: None,
            computations: 0,
        }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// Replaces the working set; cached results and options are invalidated.
    pub fn set_records(&mut self, records: Vec<JobRecord>) {
        self.records = records;
        self.generation += 1;
    }

    /// Records a keystroke. Any pending term is discarded and the timer restarts at `now`.
    pub fn set_search_term(&mut self, term: impl Into<String>, now: Instant) {
        let term = term.into();
        self.input_term = term.clone();

        if self.debounce.is_zero() {
            self.commit(term);
            return;
        }

        self.state = DebounceState::Pending {
            term,
            deadline: now + self.debounce,
        };
    }

    /// Commits the pending term once its deadline has passed. Returns whether it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = matches!(
            &self.state,
            DebounceState::Pending { deadline, .. } if now >= *deadline
        );
        due && self.flush()
    }

    /// Commits the pending term immediately, e.g. when the user presses enter.
    pub fn flush(&mut self) -> bool {
        let state = std::mem::replace(&mut self.state, DebounceState::Idle);
        match state {
            DebounceState::Pending { term, .. } => {
                self.commit(term);
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Waits out the pending timer, if any, and commits the term.
    pub async fn settle(&mut self) -> bool {
        let deadline = match &self.state {
            DebounceState::Pending { deadline, .. } => *deadline,
            _ => return false,
        };
        sleep_until(deadline).await;
        self.poll(Instant::now())
    }

    fn commit(&mut self, term: String) {
        debug!(term = %term, "search term settled");
        self.debounced_term = term;
        self.state = DebounceState::Idle;
        self.results();
    }

    pub fn set_filters(&mut self, filters: FilterSelection) {
        self.filters = filters;
    }

    pub fn update_filters(&mut self, update: impl FnOnce(&mut FilterSelection)) {
        update(&mut self.filters);
    }

    pub fn set_sort(&mut self, sort_key: SortKey, sort_order: SortOrder) {
        self.sort_key = sort_key;
        self.sort_order = sort_order;
    }

    /// Pipeline output for the current inputs, recomputed only when one of them changed.
    pub fn results(&mut self) -> &SearchResults {
        let key = self.pipeline_key();
        let memo = match self.memo.take() {
            Some((cached, results)) if cached == key => (cached, results),
            _ => {
                let results = self.compute(&key);
                (key, results)
            }
        };
        &self.memo.insert(memo).1
    }

    /// Options for the filter controls, derived from the full working set.
    pub fn options(&mut self) -> &AvailableOptions {
        let generation = self.generation;
        let cached = match self.options.take() {
            Some((seen, options)) if seen == generation => options,
            _ => extract_options(&self.records),
        };
        &self.options.insert((generation, cached)).1
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_filter_count()
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    /// Term as typed, including keystrokes still waiting on the debounce.
    pub fn search_term(&self) -> &str {
        &self.input_term
    }

    pub fn debounced_term(&self) -> &str {
        &self.debounced_term
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn sort(&self) -> (SortKey, SortOrder) {
        (self.sort_key, self.sort_order)
    }

    /// Number of pipeline runs so far.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    fn pipeline_key(&self) -> PipelineKey {
        PipelineKey {
            generation: self.generation,
            term: self.debounced_term.clone(),
            filters: self.filters.clone(),
            sort_key: self.sort_key,
            sort_order: self.sort_order,
        }
    }

    fn compute(&mut self, key: &PipelineKey) -> SearchResults {
        let pending = matches!(self.state, DebounceState::Pending { .. });
        if !pending {
            self.state = DebounceState::Computing;
        }

        self.computations += 1;
        let results = run_pipeline(
            &self.records,
            &key.term,
            &key.filters,
            key.sort_key,
            key.sort_order,
        );
        debug!(
            records = self.records.len(),
            matched = results.jobs.len(),
            tier = results.tier.label(),
            "search pipeline recomputed"
        );

        if !pending {
            self.state = DebounceState::Settled;
        }
        results
    }
}
