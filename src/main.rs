use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shutterlist_backend::{api_router, db, initialize_app_state};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shutterlist_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = shutterlist_backend::app_config::config();
    info!("Starting Shutterlist API on {}", config.bind_address);
    info!(
        "Database: {}",
        db::mask_connection_string(&config.database_url)
    );

    let state = match initialize_app_state().await {
        Ok(state) => {
            info!("Application state initialized");
            state
        },
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(std::io::Error::other(format!(
                "Initialization failed: {}",
                e
            )));
        },
    };

    let bind_address = state.config.bind_address.clone();
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app).await
}
