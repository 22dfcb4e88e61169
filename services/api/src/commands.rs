use clap::Args;
use job_search::catalog::JobCatalog;
use job_search::config::AppConfig;
use job_search::error::AppError;
use job_search::search::budget::{install_global_parser, parse_budget};
use job_search::search::domain::{
    AvailableOptions, FilterDimension, FilterSelection, JobRecord, SortKey, SortOrder,
};
use job_search::search::orchestrator::{QueryOrchestrator, SearchResults};
use job_search::search::roles::normalize_selection;
use std::path::PathBuf;
use tokio::time::Instant;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// JSON or CSV catalog to search
    #[arg(long, env = "JOB_CATALOG_PATH")]
    pub(crate) catalog: PathBuf,
    /// Free-text query matched against title, description, skills and location
    #[arg(long, short = 'q')]
    pub(crate) query: Option<String>,
    #[arg(long)]
    pub(crate) employment_type: Option<String>,
    #[arg(long)]
    pub(crate) location_type: Option<String>,
    #[arg(long)]
    pub(crate) experience_level: Option<String>,
    #[arg(long)]
    pub(crate) country: Option<String>,
    #[arg(long)]
    pub(crate) state: Option<String>,
    #[arg(long)]
    pub(crate) duration: Option<String>,
    /// Lower budget bound (annualized for hourly full/part-time postings)
    #[arg(long)]
    pub(crate) budget_min: Option<f64>,
    /// Upper budget bound; 200000 or more is open-ended
    #[arg(long)]
    pub(crate) budget_max: Option<f64>,
    #[arg(long, default_value = "createdAt")]
    pub(crate) sort_by: SortKey,
    #[arg(long, default_value = "desc")]
    pub(crate) order: SortOrder,
    /// Snap filter values onto the closest values present in the catalog
    #[arg(long)]
    pub(crate) normalize: bool,
    /// Print at most this many postings
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Emit JSON instead of a text listing
    #[arg(long)]
    pub(crate) json: bool,
}

impl SearchArgs {
    fn selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::default();
        let fields = [
            (&mut selection.employment_type, &self.employment_type),
            (&mut selection.location_type, &self.location_type),
            (&mut selection.experience_level, &self.experience_level),
            (&mut selection.country, &self.country),
            (&mut selection.state, &self.state),
            (&mut selection.duration, &self.duration),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }

        if self.budget_min.is_some() || self.budget_max.is_some() {
            let unbounded = selection.budget_range;
            selection.set_budget_range(
                self.budget_min.unwrap_or(unbounded.min()),
                self.budget_max.unwrap_or(unbounded.max()),
            );
        }

        selection
    }
}

#[derive(Args, Debug)]
pub(crate) struct OptionsArgs {
    /// JSON or CSV catalog to inspect
    #[arg(long, env = "JOB_CATALOG_PATH")]
    pub(crate) catalog: PathBuf,
    /// Emit JSON instead of a text listing
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    install_global_parser(config.search.budget_cache_capacity.get());

    let catalog = JobCatalog::from_path(&args.catalog)?;
    let mut orchestrator = QueryOrchestrator::with_debounce(catalog.into_jobs(), config.search.debounce);

    let mut selection = args.selection();
    if args.normalize {
        selection = normalize_selection(&selection, orchestrator.options());
    }
    orchestrator.set_filters(selection);
    orchestrator.set_sort(args.sort_by, args.order);
    orchestrator.set_search_term(args.query.clone().unwrap_or_default(), Instant::now());
    orchestrator.flush();

    let active_filters = orchestrator.active_filter_count();
    let results = orchestrator.results();

    if args.json {
        let payload = serde_json::json!({
            "jobs": limited(&results.jobs, args.limit),
            "total": results.jobs.len(),
            "tier": results.tier,
            "strictCount": results.strict_count,
            "activeFilterCount": active_filters,
        });
        println!("{}", to_pretty_json(&payload)?);
        return Ok(());
    }

    render_results(
        args.query.as_deref().unwrap_or_default(),
        results,
        active_filters,
        args.limit,
    );
    Ok(())
}

pub(crate) fn run_options(args: OptionsArgs) -> Result<(), AppError> {
    let catalog = JobCatalog::from_path(&args.catalog)?;
    let options = catalog.options();

    if args.json {
        println!("{}", to_pretty_json(&options)?);
        return Ok(());
    }

    render_options(&options, catalog.len());
    Ok(())
}

fn render_results(query: &str, results: &SearchResults, active_filters: usize, limit: Option<usize>) {
    println!("=== Job Search ===");
    if query.trim().is_empty() {
        println!("Query: (none)");
    } else {
        println!("Query: {query}");
    }
    println!(
        "Matches: {} (strict {}, tier {}, active filters {})",
        results.jobs.len(),
        results.strict_count,
        results.tier.label(),
        active_filters
    );
    if results.degraded {
        println!("Warning: filters were rejected; showing the unfiltered catalog.");
    }

    let shown = limited(&results.jobs, limit);
    if shown.is_empty() {
        println!("\nNo postings matched.");
        return;
    }

    println!();
    for (rank, job) in shown.iter().enumerate() {
        println!("{:>3}. {}", rank + 1, describe(job));
    }
    if shown.len() < results.jobs.len() {
        println!("... {} more", results.jobs.len() - shown.len());
    }
}

fn describe(job: &JobRecord) -> String {
    let mut parts = vec![format!("{} [{}]", display_or(&job.title, "Untitled"), job.id)];

    let employment = job.effective_employment_type();
    if !employment.trim().is_empty() {
        parts.push(employment.to_string());
    }
    if !job.location_type.trim().is_empty() {
        parts.push(job.location_type.clone());
    }

    let budget = parse_budget(job.budget.as_deref(), employment);
    if budget > 0.0 {
        parts.push(format!("~${budget:.0}"));
    }
    if let Some(created) = job.created_at {
        parts.push(format!("posted {}", created.format("%Y-%m-%d")));
    }
    if job.pending_application_count > 0 {
        parts.push(format!("{} pending", job.pending_application_count));
    }

    parts.join(" | ")
}

fn render_options(options: &AvailableOptions, job_count: usize) {
    println!("=== Filter Options ({job_count} postings) ===");
    for dimension in FilterDimension::ALL {
        if dimension == FilterDimension::Budget {
            continue;
        }
        let values = options.values(dimension);
        if values.is_empty() {
            println!("{}: (none)", dimension.label());
        } else {
            println!("{}: {}", dimension.label(), values.join(", "));
        }
    }
}

fn limited(jobs: &[JobRecord], limit: Option<usize>) -> &[JobRecord] {
    match limit {
        Some(limit) => &jobs[..limit.min(jobs.len())],
        None => jobs,
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}
