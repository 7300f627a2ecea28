mod cli;
mod infra;
mod report;
mod routes;
mod server;

use park_rating::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
