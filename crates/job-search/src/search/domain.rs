use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Selection value meaning "no constraint" for a string dimension.
pub const ALL: &str = "all";

/// Upper bound of the budget slider. A range reaching it is open-ended.
pub const BUDGET_CEILING: f64 = 200_000.0;

/// Job posting as supplied by the job source. The engine never mutates it.
///
/// Every field tolerates being absent, `null`, or of an unexpected JSON shape;
/// such values collapse to the field's empty value instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub required_skills: String,
    #[serde(deserialize_with = "lenient_text")]
    pub employment_type: String,
    /// Legacy spelling of the employment type kept by older postings.
    #[serde(deserialize_with = "lenient_text")]
    pub role_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub experience_level: String,
    #[serde(deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(deserialize_with = "lenient_text")]
    pub state: String,
    #[serde(deserialize_with = "lenient_text")]
    pub city: String,
    #[serde(deserialize_with = "lenient_text")]
    pub duration: String,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub budget: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_count")]
    pub application_count: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub pending_application_count: u32,
}

impl JobRecord {
    /// Employment type with the legacy `role_type` used when the canonical field is blank.
    pub fn effective_employment_type(&self) -> &str {
        if self.employment_type.trim().is_empty() {
            &self.role_type
        } else {
            &self.employment_type
        }
    }

    /// The record's value for a string filter dimension. Budget yields the raw budget text.
    pub fn dimension_value(&self, dimension: FilterDimension) -> &str {
        match dimension {
            FilterDimension::EmploymentType => self.effective_employment_type(),
            FilterDimension::LocationType => &self.location_type,
            FilterDimension::ExperienceLevel => &self.experience_level,
            FilterDimension::Country => &self.country,
            FilterDimension::State => &self.state,
            FilterDimension::Duration => &self.duration,
            FilterDimension::Budget => self.budget.as_deref().unwrap_or(""),
        }
    }
}

/// Dimensions a caller can constrain through a [`FilterSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    EmploymentType,
    LocationType,
    ExperienceLevel,
    Country,
    State,
    Duration,
    Budget,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 7] = [
        FilterDimension::EmploymentType,
        FilterDimension::LocationType,
        FilterDimension::ExperienceLevel,
        FilterDimension::Country,
        FilterDimension::State,
        FilterDimension::Duration,
        FilterDimension::Budget,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FilterDimension::EmploymentType => "employmentType",
            FilterDimension::LocationType => "locationType",
            FilterDimension::ExperienceLevel => "experienceLevel",
            FilterDimension::Country => "country",
            FilterDimension::State => "state",
            FilterDimension::Duration => "duration",
            FilterDimension::Budget => "budgetRange",
        }
    }

    pub(crate) const fn bit(self) -> u8 {
        match self {
            FilterDimension::EmploymentType => 1 << 0,
            FilterDimension::LocationType => 1 << 1,
            FilterDimension::ExperienceLevel => 1 << 2,
            FilterDimension::Country => 1 << 3,
            FilterDimension::State => 1 << 4,
            FilterDimension::Duration => 1 << 5,
            FilterDimension::Budget => 1 << 6,
        }
    }
}

/// Inclusive `[min, max]` budget bounds. Construction keeps `0 <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct BudgetRange {
    min: f64,
    max: f64,
}

impl BudgetRange {
    /// The sentinel `[0, 200000]` range that places no constraint on budgets.
    pub const UNBOUNDED: BudgetRange = BudgetRange {
        min: 0.0,
        max: BUDGET_CEILING,
    };

    /// Builds a range, swapping inverted bounds and clamping negatives to zero.
    pub fn new(first: f64, second: f64) -> Self {
        let first = first.max(0.0);
        let second = second.max(0.0);
        if first <= second {
            Self {
                min: first,
                max: second,
            }
        } else {
            Self {
                min: second,
                max: first,
            }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_unbounded(&self) -> bool {
        self.min <= 0.0 && self.max >= BUDGET_CEILING
    }

    /// Inclusive containment; a max at or past the ceiling accepts anything `>= min`.
    pub fn contains(&self, amount: f64) -> bool {
        if self.max >= BUDGET_CEILING {
            amount >= self.min
        } else {
            amount >= self.min && amount <= self.max
        }
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl From<(f64, f64)> for BudgetRange {
    fn from((first, second): (f64, f64)) -> Self {
        Self::new(first, second)
    }
}

impl From<BudgetRange> for (f64, f64) {
    fn from(range: BudgetRange) -> Self {
        (range.min, range.max)
    }
}

/// Structured filter selection owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    #[serde(deserialize_with = "lenient_text")]
    pub employment_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub experience_level: String,
    #[serde(deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(deserialize_with = "lenient_text")]
    pub state: String,
    #[serde(deserialize_with = "lenient_text")]
    pub duration: String,
    pub budget_range: BudgetRange,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            employment_type: ALL.to_string(),
            location_type: ALL.to_string(),
            experience_level: ALL.to_string(),
            country: ALL.to_string(),
            state: ALL.to_string(),
            duration: ALL.to_string(),
            budget_range: BudgetRange::UNBOUNDED,
        }
    }
}

impl FilterSelection {
    /// Selected value for a string dimension; `None` for budget.
    pub fn selected(&self, dimension: FilterDimension) -> Option<&str> {
        match dimension {
            FilterDimension::EmploymentType => Some(&self.employment_type),
            FilterDimension::LocationType => Some(&self.location_type),
            FilterDimension::ExperienceLevel => Some(&self.experience_level),
            FilterDimension::Country => Some(&self.country),
            FilterDimension::State => Some(&self.state),
            FilterDimension::Duration => Some(&self.duration),
            FilterDimension::Budget => None,
        }
    }

    pub(crate) fn selected_mut(&mut self, dimension: FilterDimension) -> Option<&mut String> {
        match dimension {
            FilterDimension::EmploymentType => Some(&mut self.employment_type),
            FilterDimension::LocationType => Some(&mut self.location_type),
            FilterDimension::ExperienceLevel => Some(&mut self.experience_level),
            FilterDimension::Country => Some(&mut self.country),
            FilterDimension::State => Some(&mut self.state),
            FilterDimension::Duration => Some(&mut self.duration),
            FilterDimension::Budget => None,
        }
    }

    pub fn set_budget_range(&mut self, first: f64, second: f64) {
        self.budget_range = BudgetRange::new(first, second);
    }

    /// Whether the dimension is at its default ("all" or the sentinel budget range).
    pub fn is_default(&self, dimension: FilterDimension) -> bool {
        match self.selected(dimension) {
            Some(value) => is_unconstrained(value),
            None => self.budget_range.is_unbounded(),
        }
    }

    pub fn active_filter_count(&self) -> usize {
        FilterDimension::ALL
            .iter()
            .filter(|dimension| !self.is_default(**dimension))
            .count()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Rejects selections the pipeline cannot evaluate meaningfully.
    pub fn validate(&self) -> Result<(), SelectionError> {
        let range = self.budget_range;
        if !range.min().is_finite() || !range.max().is_finite() {
            return Err(SelectionError::NonFiniteBudget {
                min: range.min(),
                max: range.max(),
            });
        }
        Ok(())
    }
}

/// Treats blank selections like "all" so an emptied control never filters everything out.
pub fn is_unconstrained(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("budget range [{min}, {max}] must have finite bounds")]
    NonFiniteBudget { min: f64, max: f64 },
}

/// Ranking keys supported by the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Budget,
    ApplicationCount,
    NeedsAttention,
    Title,
}

impl SortKey {
    pub const fn label(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
            SortKey::Budget => "budget",
            SortKey::ApplicationCount => "applicationCount",
            SortKey::NeedsAttention => "needsAttention",
            SortKey::Title => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "createdat" | "created" | "date" => Ok(SortKey::CreatedAt),
            "updatedat" | "updated" => Ok(SortKey::UpdatedAt),
            "budget" => Ok(SortKey::Budget),
            "applicationcount" | "applications" => Ok(SortKey::ApplicationCount),
            "needsattention" | "attention" => Ok(SortKey::NeedsAttention),
            "title" => Ok(SortKey::Title),
            _ => Err(format!(
                "unknown sort key '{raw}' (expected createdAt, updatedAt, budget, applicationCount, needsAttention or title)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(format!("unknown sort order '{raw}' (expected asc or desc)")),
        }
    }
}

/// Distinct values observed per filter dimension, used to populate selection controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableOptions {
    pub employment_types: Vec<String>,
    pub location_types: Vec<String>,
    pub experience_levels: Vec<String>,
    pub countries: Vec<String>,
    pub states: Vec<String>,
    pub durations: Vec<String>,
}

impl AvailableOptions {
    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::EmploymentType => &self.employment_types,
            FilterDimension::LocationType => &self.location_types,
            FilterDimension::ExperienceLevel => &self.experience_levels,
            FilterDimension::Country => &self.countries,
            FilterDimension::State => &self.states,
            FilterDimension::Duration => &self.durations,
            FilterDimension::Budget => &[],
        }
    }

    pub(crate) fn values_mut(&mut self, dimension: FilterDimension) -> Option<&mut Vec<String>> {
        match dimension {
            FilterDimension::EmploymentType => Some(&mut self.employment_types),
            FilterDimension::LocationType => Some(&mut self.location_types),
            FilterDimension::ExperienceLevel => Some(&mut self.experience_levels),
            FilterDimension::Country => Some(&mut self.countries),
            FilterDimension::State => Some(&mut self.states),
            FilterDimension::Duration => Some(&mut self.durations),
            FilterDimension::Budget => None,
        }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .map(text_from_value)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = text_from_value(&value);
    Ok(if text.trim().is_empty() {
        None
    } else {
        Some(text)
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|amount| amount.is_finite() && *amount > 0.0)
                    .map(|amount| amount as u64)
            })
            .unwrap_or(0),
        Value::String(text) => text.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(count.min(u64::from(u32::MAX)) as u32)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(text) => parse_timestamp(text),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}
