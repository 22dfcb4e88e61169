use super::budget::parse_budget;
use super::domain::{is_unconstrained, FilterDimension, FilterSelection, JobRecord};

/// Set of dimensions that take part in a filter evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMask(u8);

impl FilterMask {
    pub const NONE: FilterMask = FilterMask(0);
    pub const ALL: FilterMask = FilterMask(0b0111_1111);

    pub const fn with(self, dimension: FilterDimension) -> Self {
        FilterMask(self.0 | dimension.bit())
    }

    pub const fn without(self, dimension: FilterDimension) -> Self {
        FilterMask(self.0 & !dimension.bit())
    }

    pub const fn contains(self, dimension: FilterDimension) -> bool {
        self.0 & dimension.bit() != 0
    }
}

impl Default for FilterMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Conjunction of every structured filter in `filters`.
pub fn matches_filters(job: &JobRecord, filters: &FilterSelection) -> bool {
    matches_filters_masked(job, filters, FilterMask::ALL)
}

/// Conjunction restricted to the dimensions in `mask`.
pub fn matches_filters_masked(job: &JobRecord, filters: &FilterSelection, mask: FilterMask) -> bool {
    FilterDimension::ALL
        .iter()
        .filter(|dimension| mask.contains(**dimension))
        .all(|dimension| dimension_passes(job, filters, *dimension))
}

fn dimension_passes(job: &JobRecord, filters: &FilterSelection, dimension: FilterDimension) -> bool {
    match filters.selected(dimension) {
        Some(selected) => {
            is_unconstrained(selected) || job.dimension_value(dimension).trim() == selected.trim()
        }
        None => budget_passes(job, filters),
    }
}

fn budget_passes(job: &JobRecord, filters: &FilterSelection) -> bool {
    let range = filters.budget_range;
    if range.is_unbounded() {
        return true;
    }

    let amount = parse_budget(job.budget.as_deref(), job.effective_employment_type());
    amount == 0.0 || range.contains(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::domain::BUDGET_CEILING;

    fn job(employment_type: &str, budget: Option<&str>) -> JobRecord {
        JobRecord {
            title: "Platform Engineer".to_string(),
            employment_type: employment_type.to_string(),
            location_type: "remote".to_string(),
            country: "Canada".to_string(),
            budget: budget.map(str::to_string),
            ..JobRecord::default()
        }
    }

    #[test]
    fn default_selection_accepts_every_job() {
        let filters = FilterSelection::default();
        let jobs = [
            job("full-time", Some("90k")),
            JobRecord::default(),
            job("", Some("garbage")),
        ];
        assert!(jobs.iter().all(|job| matches_filters(job, &filters)));
    }

    #[test]
    fn string_dimensions_require_equality() {
        let filters = FilterSelection {
            employment_type: "contract".to_string(),
            ..FilterSelection::default()
        };
        assert!(!matches_filters(&job("full-time", None), &filters));
        assert!(matches_filters(&job("contract", None), &filters));

        let legacy = JobRecord {
            role_type: "contract".to_string(),
            ..JobRecord::default()
        };
        assert!(matches_filters(&legacy, &filters));
    }

    #[test]
    fn surrounding_whitespace_is_ignored_on_both_sides() {
        let mut padded = job(" contract ", None);
        padded.location_type = "remote ".to_string();
        let filters = FilterSelection {
            employment_type: "contract".to_string(),
            location_type: " remote".to_string(),
            ..FilterSelection::default()
        };
        assert!(matches_filters(&padded, &filters));
    }

    #[test]
    fn unspecified_budgets_are_never_excluded() {
        let mut filters = FilterSelection::default();
        filters.set_budget_range(100_000.0, 150_000.0);

        assert!(matches_filters(&job("contract", None), &filters));
        assert!(matches_filters(&job("contract", Some("TBD")), &filters));
        assert!(!matches_filters(&job("contract", Some("45k")), &filters));
        assert!(matches_filters(&job("contract", Some("$120,000")), &filters));
    }

    #[test]
    fn budget_uses_hourly_annualization() {
        let mut filters = FilterSelection::default();
        filters.set_budget_range(60_000.0, 80_000.0);
        assert!(matches_filters(&job("full-time", Some("35")), &filters));
        assert!(!matches_filters(&job("contract", Some("35")), &filters));
    }

    #[test]
    fn open_ended_budget_accepts_high_values() {
        let mut filters = FilterSelection::default();
        filters.set_budget_range(150_000.0, BUDGET_CEILING);
        assert!(matches_filters(&job("contract", Some("250k")), &filters));
        assert!(!matches_filters(&job("contract", Some("140k")), &filters));
    }

    #[test]
    fn masked_dimensions_are_ignored() {
        let filters = FilterSelection {
            employment_type: "full-time".to_string(),
            duration: "6 months".to_string(),
            ..FilterSelection::default()
        };
        let record = job("full-time", None);
        assert!(!matches_filters(&record, &filters));

        let mask = FilterMask::ALL.without(FilterDimension::Duration);
        assert!(matches_filters_masked(&record, &filters, mask));
        assert!(matches_filters_masked(&record, &filters, FilterMask::NONE));
        assert!(!matches_filters_masked(
            &record,
            &filters,
            FilterMask::NONE.with(FilterDimension::Duration)
        ));
    }
}
