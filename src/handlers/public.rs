// Public property-page and lead-submission handlers
// No authentication; only active listings resolve, and the unbranded shape
// never contains an agent field

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    app::AppState,
    models::lead::CreateLeadRequest,
    services::{lead::LeadService, listing::ListingService},
    utils::service_error::ServiceError,
};

/// GET /p/{slug} - branded property page data, agent block included
pub async fn get_branded_listing(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let service = ListingService::new(&state);
    match service.get_public_listing(&slug).await {
        Ok(graph) => Json(graph.to_public_branded()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /p/{slug}/mls - unbranded/MLS property page data, no agent block
pub async fn get_unbranded_listing(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let service = ListingService::new(&state);
    match service.get_public_listing(&slug).await {
        Ok(graph) => Json(graph.to_public_unbranded()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /p/{slug}/leads - buyer lead submission
pub async fn submit_lead(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<CreateLeadRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let service = LeadService::new(&state);
    match service.submit_lead(&slug, request).await {
        Ok(lead) => (StatusCode::CREATED, Json(lead)).into_response(),
        Err(e) => e.into_response(),
    }
}
