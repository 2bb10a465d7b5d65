// Owner-facing lead listing handler
// Public lead submission lives in handlers::public

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Json},
};

use crate::{
    app::AppState,
    handlers::parse_user_id,
    middleware::auth::AuthenticatedUser,
    services::lead::LeadService,
};

/// GET /leads - all leads across the account's listings, newest first
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = LeadService::new(&state);
    match service.list_for_owner(owner_id).await {
        Ok(leads) => Json(leads).into_response(),
        Err(e) => e.into_response(),
    }
}
