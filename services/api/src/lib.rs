mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use job_search::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
