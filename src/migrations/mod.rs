// Migration orchestrator for the Shutterlist backend
// Embedded in the application binary for distroless container compatibility

pub mod diesel;

use crate::db::DieselPool;
use std::error::Error;
use tracing::{error, info};

/// Run all pending migrations
pub async fn run_all_migrations(
    diesel_pool: &DieselPool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("[MIGRATIONS] Running Diesel (PostgreSQL) migrations...");
    match diesel::run_migrations(diesel_pool).await {
        Ok(applied_count) => {
            if applied_count > 0 {
                info!("[MIGRATIONS] Applied {} Diesel migrations", applied_count);
            } else {
                info!("[MIGRATIONS] Diesel migrations up to date");
            }
            Ok(())
        },
        Err(e) => {
            error!("[MIGRATIONS] Diesel migration failed: {}", e);
            Err(format!("Diesel migration failed: {}", e).into())
        },
    }
}

/// Check if migrations should run based on environment variables
pub fn should_run_migrations() -> bool {
    !crate::app_config::config().disable_embedded_migrations
}
