use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::search::domain::{parse_timestamp, JobRecord};

/// Reads a CSV export whose headers use the JSON field names (camelCase or snake_case).
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<JobRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut jobs = Vec::new();

    for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        jobs.push(row?.into_record(index));
    }

    Ok(jobs)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CatalogRow {
    #[serde(deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(alias = "required_skills", deserialize_with = "empty_string_as_none")]
    required_skills: Option<String>,
    #[serde(alias = "employment_type", deserialize_with = "empty_string_as_none")]
    employment_type: Option<String>,
    #[serde(alias = "role_type", deserialize_with = "empty_string_as_none")]
    role_type: Option<String>,
    #[serde(alias = "location_type", deserialize_with = "empty_string_as_none")]
    location_type: Option<String>,
    #[serde(alias = "experience_level", deserialize_with = "empty_string_as_none")]
    experience_level: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    country: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    duration: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    budget: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(alias = "created_at", deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
    #[serde(alias = "updated_at", deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
    #[serde(alias = "application_count", deserialize_with = "empty_string_as_none")]
    application_count: Option<String>,
    #[serde(
        alias = "pending_application_count",
        deserialize_with = "empty_string_as_none"
    )]
    pending_application_count: Option<String>,
}

impl CatalogRow {
    fn into_record(self, index: usize) -> JobRecord {
        JobRecord {
            id: self.id.unwrap_or_else(|| format!("row-{}", index + 1)),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            required_skills: self.required_skills.unwrap_or_default(),
            employment_type: self.employment_type.unwrap_or_default(),
            role_type: self.role_type.unwrap_or_default(),
            location_type: self.location_type.unwrap_or_default(),
            experience_level: self.experience_level.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            budget: self.budget,
            status: self.status.unwrap_or_default(),
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
            application_count: parse_count(self.application_count.as_deref()),
            pending_application_count: parse_count(self.pending_application_count.as_deref()),
        }
    }
}

fn parse_count(value: Option<&str>) -> u32 {
    let Some(value) = value.map(str::trim) else {
        return 0;
    };

    value
        .parse::<u32>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|count| count.is_finite() && *count > 0.0)
                .map(|count| count.min(f64::from(u32::MAX)) as u32)
        })
        .unwrap_or(0)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
