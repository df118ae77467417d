//! Seed command - Loads fixture data without starting the server.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let services = Services::from_connection(db.get_connection(), config);
    let report = services.seed().run().await?;

    println!(
        "Seeded {} users and {} products",
        report.users, report.products
    );
    Ok(())
}
