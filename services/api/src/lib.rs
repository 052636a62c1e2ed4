mod cli;
mod demo;
mod infra;
mod leads;
mod render;
mod routes;
mod server;

use lead_desk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
