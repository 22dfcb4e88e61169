//! Strict search with progressive filter relaxation for textual queries.
//!
//! When a query combines free text with structured filters and the strict
//! conjunction yields fewer than [`RELAXATION_TRIGGER`] jobs, weaker filter sets
//! are tried in a fixed order. Each tier is evaluated against the full record set
//! and is adopted only when it returns strictly more jobs than the current best.
//!
//! The first tier gates the rest: if keeping the employment, location,
//! experience, country and state filters still yields nothing new, those
//! filters are what empties the result and the cascade stops there. The text
//! requirement is never relaxed, and filter-only browsing is never relaxed.

use serde::Serialize;
use tracing::debug;

use super::domain::{FilterDimension, FilterSelection, JobRecord};
use super::filters::{matches_filters_masked, FilterMask};
use super::text::matches_search_term;

/// Strict result counts below this start the cascade.
pub const RELAXATION_TRIGGER: usize = 5;
/// Continue past the first tier while fewer results than this are held.
const EMPLOYMENT_ONLY_TRIGGER: usize = 3;
/// Continue to text-only while fewer results than this are held.
const TEXT_ONLY_TRIGGER: usize = 2;

/// Filter combination that produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelaxationTier {
    Strict,
    DropBudgetAndDuration,
    EmploymentTypeOnly,
    TextOnly,
}

impl RelaxationTier {
    pub const fn mask(self) -> FilterMask {
        match self {
            RelaxationTier::Strict => FilterMask::ALL,
            RelaxationTier::DropBudgetAndDuration => FilterMask::ALL
                .without(FilterDimension::Budget)
                .without(FilterDimension::Duration),
            RelaxationTier::EmploymentTypeOnly => {
                FilterMask::NONE.with(FilterDimension::EmploymentType)
            }
            RelaxationTier::TextOnly => FilterMask::NONE,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RelaxationTier::Strict => "strict",
            RelaxationTier::DropBudgetAndDuration => "drop_budget_and_duration",
            RelaxationTier::EmploymentTypeOnly => "employment_type_only",
            RelaxationTier::TextOnly => "text_only",
        }
    }

    pub fn is_relaxed(self) -> bool {
        self != RelaxationTier::Strict
    }
}

/// Cascade result together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub jobs: Vec<JobRecord>,
    pub tier: RelaxationTier,
    pub strict_count: usize,
}

/// Matching jobs in input order, relaxed when the query is over-constrained.
pub fn search(jobs: &[JobRecord], search_term: &str, filters: &FilterSelection) -> Vec<JobRecord> {
    search_with_outcome(jobs, search_term, filters).jobs
}

pub fn search_with_outcome(
    jobs: &[JobRecord],
    search_term: &str,
    filters: &FilterSelection,
) -> SearchOutcome {
    let term = search_term.trim();
    let strict = evaluate_tier(jobs, term, filters, RelaxationTier::Strict);
    let strict_count = strict.len();

    let mut best = (RelaxationTier::Strict, strict);
    let should_relax =
        !term.is_empty() && filters.has_active_filters() && strict_count < RELAXATION_TRIGGER;

    if should_relax {
        let gate = RelaxationTier::DropBudgetAndDuration;
        let widened = evaluate_tier(jobs, term, filters, gate);
        if widened.len() > best.1.len() {
            debug!(
                tier = gate.label(),
                count = widened.len(),
                strict_count,
                "adopted relaxation tier"
            );
            best = (gate, widened);

            let ladder = [
                (RelaxationTier::EmploymentTypeOnly, EMPLOYMENT_ONLY_TRIGGER),
                (RelaxationTier::TextOnly, TEXT_ONLY_TRIGGER),
            ];
            for (tier, trigger) in ladder {
                if best.1.len() >= trigger {
                    break;
                }

                let candidate = evaluate_tier(jobs, term, filters, tier);
                if candidate.len() > best.1.len() {
                    debug!(
                        tier = tier.label(),
                        count = candidate.len(),
                        strict_count,
                        "adopted relaxation tier"
                    );
                    best = (tier, candidate);
                }
            }
        } else {
            debug!(
                strict_count,
                "kept filters exclude every match; not relaxing further"
            );
        }
    }

    let (tier, matched) = best;
    SearchOutcome {
        jobs: matched.into_iter().cloned().collect(),
        tier,
        strict_count,
    }
}

fn evaluate_tier<'a>(
    jobs: &'a [JobRecord],
    term: &str,
    filters: &FilterSelection,
    tier: RelaxationTier,
) -> Vec<&'a JobRecord> {
    let mask = tier.mask();
    jobs.iter()
        .filter(|job| matches_filters_masked(job, filters, mask) && matches_search_term(job, term))
        .collect()
}
