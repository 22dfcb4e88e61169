//! Role snapping for filter values that arrive from outside the filter UI
//! (saved searches, generated queries). Not used while filtering.

use tracing::debug;

use super::domain::{is_unconstrained, AvailableOptions, FilterDimension, FilterSelection, ALL};

/// Canonical role categories and the terms that imply them.
pub static ROLE_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "designer",
        &[
            "design", "designer", "ui", "ux", "graphic", "visual", "creative", "illustrator",
            "illustration", "product designer",
        ],
    ),
    (
        "developer",
        &[
            "developer", "engineer", "engineering", "programmer", "software", "frontend",
            "backend", "full stack", "fullstack", "web developer", "coder", "devops",
        ],
    ),
    (
        "marketer",
        &[
            "marketing", "marketer", "growth", "seo", "sem", "social media", "brand",
            "content marketing",
        ],
    ),
    (
        "analyst",
        &[
            "analyst", "analytics", "data", "business analyst", "research", "insights",
            "reporting",
        ],
    ),
    (
        "writer",
        &[
            "writer", "copywriter", "copywriting", "content", "editor", "author",
            "technical writer", "blogger",
        ],
    ),
    (
        "manager",
        &[
            "manager", "management", "lead", "director", "head", "project manager",
            "product manager", "coordinator",
        ],
    ),
    (
        "consultant",
        &["consultant", "consulting", "advisor", "specialist", "expert", "strategist"],
    ),
    (
        "sales",
        &[
            "sales", "account executive", "business development", "bdr", "sdr",
            "account manager", "closer",
        ],
    ),
];

/// Categories whose name or synonyms appear as whole words in `text`.
pub fn role_categories(text: &str) -> Vec<&'static str> {
    let padded = word_padded(text);
    if padded.trim().is_empty() {
        return Vec::new();
    }

    ROLE_SYNONYMS
        .iter()
        .filter(|(category, synonyms)| {
            std::iter::once(*category)
                .chain(synonyms.iter().copied())
                .any(|term| padded.contains(&word_padded(term)))
        })
        .map(|(category, _)| *category)
        .collect()
}

/// Snaps a user-entered role to a value present in `available`.
///
/// Tries a case-insensitive exact match, then substring containment in either
/// direction, then a shared synonym category. Falls back to `"all"`.
pub fn find_best_role_match(input: &str, available: &[String]) -> String {
    let wanted = input.trim().to_lowercase();
    if is_unconstrained(&wanted) {
        return ALL.to_string();
    }

    let candidates: Vec<(&String, String)> = available
        .iter()
        .filter(|candidate| !candidate.trim().is_empty())
        .map(|candidate| (candidate, candidate.trim().to_lowercase()))
        .collect();

    if let Some((candidate, _)) = candidates.iter().find(|(_, folded)| *folded == wanted) {
        return (*candidate).clone();
    }

    if let Some((candidate, _)) = candidates
        .iter()
        .find(|(_, folded)| folded.contains(&wanted) || wanted.contains(folded.as_str()))
    {
        return (*candidate).clone();
    }

    let wanted_categories = role_categories(&wanted);
    if !wanted_categories.is_empty() {
        if let Some((candidate, _)) = candidates.iter().find(|(_, folded)| {
            role_categories(folded)
                .iter()
                .any(|category| wanted_categories.contains(category))
        }) {
            return (*candidate).clone();
        }
    }

    ALL.to_string()
}

/// Snaps every dimension of an externally supplied selection onto observed values.
///
/// Employment type goes through [`find_best_role_match`]; the other dimensions
/// accept only a case-insensitive exact match. Unknown values become `"all"`.
pub fn normalize_selection(selection: &FilterSelection, options: &AvailableOptions) -> FilterSelection {
    let mut normalized = selection.clone();

    for dimension in FilterDimension::ALL {
        let Some(value) = normalized.selected_mut(dimension) else {
            continue;
        };
        if is_unconstrained(value) {
            *value = ALL.to_string();
            continue;
        }

        let available = options.values(dimension);
        let snapped = match dimension {
            FilterDimension::EmploymentType => find_best_role_match(value, available),
            _ => available
                .iter()
                .find(|candidate| candidate.trim().eq_ignore_ascii_case(value.trim()))
                .cloned()
                .unwrap_or_else(|| ALL.to_string()),
        };

        if snapped != *value {
            debug!(
                dimension = dimension.label(),
                requested = %value,
                snapped = %snapped,
                "normalized filter value"
            );
        }
        *value = snapped;
    }

    normalized
}

fn word_padded(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}
