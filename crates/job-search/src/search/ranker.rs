use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::budget::parse_budget;
use super::domain::{JobRecord, SortKey, SortOrder};

/// Stable sort of `jobs` by `key`. Equal keys keep their input order in both directions.
pub fn sort_jobs(jobs: &[JobRecord], key: SortKey, order: SortOrder) -> Vec<JobRecord> {
    let mut sorted = jobs.to_vec();
    sort_in_place(&mut sorted, key, order);
    sorted
}

pub fn sort_in_place(jobs: &mut [JobRecord], key: SortKey, order: SortOrder) {
    jobs.sort_by(|a, b| match order {
        SortOrder::Asc => compare(a, b, key),
        SortOrder::Desc => compare(b, a, key),
    });
}

fn compare(a: &JobRecord, b: &JobRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::CreatedAt => timestamp(a.created_at).cmp(&timestamp(b.created_at)),
        SortKey::UpdatedAt => timestamp(a.updated_at).cmp(&timestamp(b.updated_at)),
        SortKey::Budget => budget(a).total_cmp(&budget(b)),
        SortKey::ApplicationCount => a.application_count.cmp(&b.application_count),
        SortKey::NeedsAttention => a
            .pending_application_count
            .cmp(&b.pending_application_count),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> DateTime<Utc> {
    value.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn budget(job: &JobRecord) -> f64 {
    parse_budget(job.budget.as_deref(), job.effective_employment_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::domain::parse_timestamp;

    fn job(id: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            ..JobRecord::default()
        }
    }

    fn ids(jobs: &[JobRecord]) -> Vec<&str> {
        jobs.iter().map(|job| job.id.as_str()).collect()
    }

    #[test]
    fn budget_sort_uses_each_records_employment_type() {
        let mut hourly = job("hourly");
        hourly.employment_type = "full-time".to_string();
        hourly.budget = Some("40".to_string());
        let mut project = job("project");
        project.employment_type = "project".to_string();
        project.budget = Some("5k".to_string());
        let unspecified = job("none");

        let sorted = sort_jobs(&[project, unspecified, hourly], SortKey::Budget, SortOrder::Desc);
        assert_eq!(ids(&sorted), vec!["hourly", "project", "none"]);
    }

    #[test]
    fn missing_timestamps_sort_as_epoch() {
        let mut recent = job("recent");
        recent.created_at = parse_timestamp("2025-06-01T00:00:00Z");
        let mut older = job("older");
        older.created_at = parse_timestamp("2024-01-15");
        let undated = job("undated");

        let ascending = sort_jobs(
            &[recent.clone(), undated.clone(), older.clone()],
            SortKey::CreatedAt,
            SortOrder::Asc,
        );
        assert_eq!(ids(&ascending), vec!["undated", "older", "recent"]);

        let descending = sort_jobs(&[undated, older, recent], SortKey::CreatedAt, SortOrder::Desc);
        assert_eq!(ids(&descending), vec!["recent", "older", "undated"]);
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let jobs: Vec<JobRecord> = ["a", "b", "c"]
            .into_iter()
            .map(|id| {
                let mut record = job(id);
                record.application_count = 3;
                record
            })
            .collect();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let sorted = sort_jobs(&jobs, SortKey::ApplicationCount, order);
            assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn title_sort_ignores_case() {
        let mut zeta = job("zeta");
        zeta.title = "zeta".to_string();
        let mut alpha = job("alpha");
        alpha.title = "Alpha".to_string();
        let mut beta = job("beta");
        beta.title = "beta".to_string();

        let sorted = sort_jobs(&[zeta, beta, alpha], SortKey::Title, SortOrder::Asc);
        assert_eq!(ids(&sorted), vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn needs_attention_ranks_by_pending_applications() {
        let mut busy = job("busy");
        busy.pending_application_count = 9;
        busy.application_count = 1;
        let mut quiet = job("quiet");
        quiet.pending_application_count = 1;
        quiet.application_count = 40;

        let sorted = sort_jobs(&[quiet, busy], SortKey::NeedsAttention, SortOrder::Desc);
        assert_eq!(ids(&sorted), vec!["busy", "quiet"]);
    }

    #[test]
    fn resorting_is_a_fixed_point() {
        let jobs: Vec<JobRecord> = (0..8)
            .map(|idx| {
                let mut record = job(&idx.to_string());
                record.created_at = parse_timestamp(&format!("2025-01-0{}", 1 + idx % 3));
                record
            })
            .collect();

        let once = sort_jobs(&jobs, SortKey::CreatedAt, SortOrder::Desc);
        let twice = sort_jobs(&once, SortKey::CreatedAt, SortOrder::Desc);
        assert_eq!(once, twice);
    }
}
