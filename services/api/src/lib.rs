mod cli;
mod infra;
mod routes;
mod server;

use fulfillment_guard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
