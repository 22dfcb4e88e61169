use std::collections::HashSet;

use super::domain::{AvailableOptions, FilterDimension, JobRecord};

/// Distinct non-empty values per filter dimension, in first-seen order.
///
/// Depends on the record set only, never on the current selection, so tightening
/// one filter does not hide the options of another.
pub fn extract_options(jobs: &[JobRecord]) -> AvailableOptions {
    let mut options = AvailableOptions::default();

    for dimension in FilterDimension::ALL {
        let Some(values) = options.values_mut(dimension) else {
            continue;
        };

        let mut seen = HashSet::new();
        for job in jobs {
            let value = job.dimension_value(dimension).trim();
            if !value.is_empty() && seen.insert(value) {
                values.push(value.to_string());
            }
        }
    }

    options
}
