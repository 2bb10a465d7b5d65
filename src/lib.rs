// Library exports for the Shutterlist backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use db::{DieselDatabaseConfig, DieselPool};
pub use middleware::auth_middleware;
pub use middleware::AuthenticatedUser;
pub use models::listing::{ListingGraph, ListingStatus};
pub use models::user::SubscriptionTier;
pub use services::{
    AccessTokenClaims, EmailService, ImageHost, JwtConfig, JwtError, JwtService,
    NotificationOutcome, VideoEvent, VideoHost, WebhookOutcome,
};
pub use utils::ServiceError;

// Re-export route builders
pub use handlers::{
    agent_routes, lead_routes, listing_routes, public_routes, webhook_routes,
};

use axum::middleware as axum_middleware;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

// Library initialization function for external consumers
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    // Load environment
    dotenv::dotenv().ok();

    // Initialize config
    let config = app_config::config();

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run migrations if enabled
    if migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        migrations::run_all_migrations(&diesel_pool)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    // Initialize services
    let jwt_service = Arc::new(JwtService::from_env());
    let email_service = Arc::new(EmailService::new(config.email.clone())?);
    let image_host: Arc<dyn ImageHost> =
        Arc::new(services::CloudflareImages::new(&config.image_host));
    let video_host: Arc<dyn VideoHost> = Arc::new(services::MuxVideo::new(&config.video_host));

    if config.video_host.webhook_secret.is_empty() {
        warn!("VIDEO_WEBHOOK_SECRET not set; webhook signatures will not be verified");
    }

    Ok(AppState {
        config: Arc::new(config.clone()),
        diesel_pool,
        jwt_service,
        email_service,
        image_host,
        video_host,
        max_connections,
    })
}

/// Build the complete /api/v1 router
pub fn api_router(state: AppState) -> Router {
    // Owner-scoped resources sit behind the bearer-token middleware
    let protected = Router::new()
        .nest("/agents", agent_routes())
        .nest("/listings", listing_routes())
        .nest("/leads", lead_routes())
        .route("/auth/me", get(handlers::auth::get_current_user))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public surface: signup/login, property pages, lead intake, webhooks
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", axum::routing::post(handlers::auth::signup))
        .route("/auth/login", axum::routing::post(handlers::auth::login))
        .nest("/p", public_routes())
        .nest("/webhooks", webhook_routes());

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .layer(middleware::cors_layer())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let mut overall_healthy = true;
    let timestamp = chrono::Utc::now().to_rfc3339();

    // Check PostgreSQL
    let postgres_health = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => serde_json::json!({
            "status": "healthy",
            "max_connections": state.max_connections,
            "error": null
        }),
        Err(e) => {
            overall_healthy = false;
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            })
        },
    };

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "shutterlist-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
