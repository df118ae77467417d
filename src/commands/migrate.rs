//! Migrate command - Database migration management.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(failed)?;
            tracing::info!("Pending migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(failed)?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await.map_err(failed)? {
                let state = if applied { "applied" } else { "pending" };
                println!("{:<55} {}", name, state);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.fresh_migrations().await.map_err(failed)?;
            tracing::info!("Fresh migrations completed");
        }
    }

    Ok(())
}

fn failed(e: DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", e))
}
