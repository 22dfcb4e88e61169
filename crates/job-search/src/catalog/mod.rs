//! Loading job postings from JSON or CSV exports.

mod parser;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::search::domain::{AvailableOptions, JobRecord};
use crate::search::options::extract_options;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read job catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid job catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid job catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported job catalog format for {} (expected .json or .csv)", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Csv,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(CatalogFormat::Json),
            Some("csv") => Ok(CatalogFormat::Csv),
            _ => Err(CatalogError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// JSON exports are either a bare array or wrapped as `{ "jobs": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<JobRecord>),
    Wrapped { jobs: Vec<JobRecord> },
}

/// In-memory set of job postings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCatalog {
    jobs: Vec<JobRecord>,
}

impl JobCatalog {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self { jobs }
    }

    /// Loads a catalog, choosing the parser from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        match CatalogFormat::from_path(path)? {
            CatalogFormat::Json => Self::from_json_path(path),
            CatalogFormat::Csv => Self::from_csv_path(path),
        }
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = open(path)?;
        let catalog = Self::from_json_reader(BufReader::new(file))?;
        info!(path = %path.display(), jobs = catalog.len(), "loaded JSON job catalog");
        Ok(catalog)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let jobs = match serde_json::from_reader(reader)? {
            JsonDocument::List(jobs) | JsonDocument::Wrapped { jobs } => jobs,
        };
        Ok(Self::new(jobs))
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = open(path)?;
        let catalog = Self::from_csv_reader(file)?;
        info!(path = %path.display(), jobs = catalog.len(), "loaded CSV job catalog");
        Ok(catalog)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(Self::new(parser::parse_rows(reader)?))
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn into_jobs(self) -> Vec<JobRecord> {
        self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn options(&self) -> AvailableOptions {
        extract_options(&self.jobs)
    }
}

impl From<Vec<JobRecord>> for JobCatalog {
    fn from(jobs: Vec<JobRecord>) -> Self {
        Self::new(jobs)
    }
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const SAMPLE_JSON: &str = r#"[
        {"id": "1", "title": "React Developer", "employmentType": "full-time", "budget": "90k",
         "applicationCount": "7", "createdAt": "2025-03-01T10:00:00Z"},
        {"id": 2, "title": "Graphic Designer", "roleType": "contract", "budget": 2500,
         "createdAt": "not a date", "unknownField": true}
    ]"#;

    #[test]
    fn reads_bare_json_arrays_leniently() {
        let catalog = JobCatalog::from_json_reader(Cursor::new(SAMPLE_JSON)).expect("load");
        assert_eq!(catalog.len(), 2);

        let jobs = catalog.jobs();
        assert_eq!(jobs[0].application_count, 7);
        assert!(jobs[0].created_at.is_some());
        assert_eq!(jobs[1].id, "2");
        assert_eq!(jobs[1].budget.as_deref(), Some("2500"));
        assert_eq!(jobs[1].created_at, None);
        assert_eq!(jobs[1].effective_employment_type(), "contract");
    }

    #[test]
    fn reads_wrapped_json_documents() {
        let wrapped = format!(r#"{{"jobs": {SAMPLE_JSON}}}"#);
        let catalog = JobCatalog::from_json_reader(Cursor::new(wrapped)).expect("load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.options().employment_types,
            vec!["full-time", "contract"]
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = JobCatalog::from_json_reader(Cursor::new("{ not json")).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().expect("tempdir");

        let csv_path = dir.path().join("jobs.CSV");
        let mut file = File::create(&csv_path).expect("create csv");
        writeln!(file, "id,title,employmentType").expect("write");
        writeln!(file, "9,Data Analyst,part-time").expect("write");
        let catalog = JobCatalog::from_path(&csv_path).expect("load csv");
        assert_eq!(catalog.jobs()[0].title, "Data Analyst");

        let json_path = dir.path().join("jobs.json");
        std::fs::write(&json_path, SAMPLE_JSON).expect("write json");
        assert_eq!(JobCatalog::from_path(&json_path).expect("load json").len(), 2);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = JobCatalog::from_path("jobs.xlsx").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = JobCatalog::from_path("/definitely/missing/jobs.json").unwrap_err();
        match err {
            CatalogError::Io { path, .. } => assert!(path.ends_with("jobs.json")),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
