mod check;
mod cli;
mod infra;
mod routes;
mod server;

use gift_entry::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
