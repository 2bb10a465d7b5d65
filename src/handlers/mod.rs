// HTTP handlers and route builders

pub mod agents;
pub mod auth;
pub mod leads;
pub mod listings;
pub mod photos;
pub mod public;
pub mod videos;
pub mod webhooks;

use axum::{
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::user::User,
    utils::service_error::ServiceError,
};

/// Parse the authenticated account id out of the token claims
pub fn parse_user_id(auth_user: &AuthenticatedUser) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(&auth_user.user_id).map_err(|_| ServiceError::Unauthorized)
}

/// Fetch the authenticated account's full record.
/// Needed where handlers consult current tier or other stored fields rather
/// than trusting possibly-stale token claims.
pub async fn fetch_current_user(
    state: &AppState,
    auth_user: &AuthenticatedUser,
) -> Result<User, ServiceError> {
    let user_id = parse_user_id(auth_user)?;

    let mut conn = state
        .diesel_pool
        .get()
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

    User::find_by_id(&mut conn, user_id)
        .await
        .map_err(|_| ServiceError::Unauthorized)
}

// Agent CRUD routes
pub fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(agents::list_agents).post(agents::create_agent))
        .route(
            "/{id}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
}

// Listing CRUD, status, and nested media routes
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route(
            "/{id}",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route("/{id}/status", axum::routing::patch(listings::update_listing_status))
        .route("/{id}/photos", post(photos::upload_photo))
        .route("/{id}/photos/order", put(photos::reorder_photos))
        .route("/{id}/photos/{photo_id}", axum::routing::delete(photos::delete_photo))
        .route("/{id}/videos", post(videos::create_video_upload))
        .route(
            "/{id}/videos/{video_id}",
            get(videos::get_video_status).delete(videos::delete_video),
        )
        // Photo uploads exceed the 2 MB default body limit
        .layer(axum::extract::DefaultBodyLimit::max(25 * 1024 * 1024))
}

// Owner lead routes
pub fn lead_routes() -> Router<AppState> {
    Router::new().route("/", get(leads::list_leads))
}

// Public property-page routes; no authentication
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(public::get_branded_listing))
        .route("/{slug}/mls", get(public::get_unbranded_listing))
        .route("/{slug}/leads", post(public::submit_lead))
}

// Provider webhook routes; no authentication, optionally signature-verified
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/video", post(webhooks::video_webhook))
}
