use crate::commands::{run_options, run_search, OptionsArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_search::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "job-search-api",
    about = "Search, filter and rank job postings over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one search against a catalog file and print the ranked postings
    Search(SearchArgs),
    /// Print the filter values available in a catalog file
    Options(OptionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON or CSV catalog to serve
    #[arg(long, env = "JOB_CATALOG_PATH")]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Search(args) => run_search(args),
        Command::Options(args) => run_options(args),
    }
}
