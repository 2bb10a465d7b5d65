// Listing CRUD and status transition handlers
// SL-42: create/activate run the tier quota check; address edits re-slug

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    handlers::{fetch_current_user, parse_user_id},
    middleware::auth::AuthenticatedUser,
    models::listing::{
        CreateListingRequest, ListListingsParams, ListingResponse, ListingStatus,
        ListingStatusRequest, UpdateListingRequest,
    },
    services::listing::ListingService,
    utils::service_error::ServiceError,
};

/// GET /listings - the account's listings, optionally filtered by status
pub async fn list_listings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<ListListingsParams>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = ListingService::new(&state);
    match service.list_listings(owner_id, &params).await {
        Ok(graphs) => {
            let response: Vec<ListingResponse> =
                graphs.iter().map(|g| g.to_summary()).collect();
            Json(response).into_response()
        },
        Err(e) => e.into_response(),
    }
}

/// POST /listings - create a listing
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateListingRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let user = match fetch_current_user(&state, &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let service = ListingService::new(&state);
    match service.create_listing(&user, request).await {
        Ok(graph) => (StatusCode::CREATED, Json(graph.to_summary())).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /listings/{id} - full detail including photos and videos
pub async fn get_listing(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<Uuid>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = ListingService::new(&state);
    match service.get_listing(listing_id, owner_id).await {
        Ok(graph) => Json(graph.to_detail()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PUT /listings/{id} - partial update
pub async fn update_listing(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<Uuid>,
    Json(request): Json<UpdateListingRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let user = match fetch_current_user(&state, &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let service = ListingService::new(&state);
    match service.update_listing(&user, listing_id, request).await {
        Ok(graph) => Json(graph.to_summary()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// DELETE /listings/{id}
pub async fn delete_listing(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<Uuid>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = ListingService::new(&state);
    match service.delete_listing(listing_id, owner_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// PATCH /listings/{id}/status - activate or archive
pub async fn update_listing_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<Uuid>,
    Json(request): Json<ListingStatusRequest>,
) -> impl IntoResponse {
    let next_status: ListingStatus = match request.status.parse() {
        Ok(status) => status,
        Err(message) => return ServiceError::ValidationError(message).into_response(),
    };

    let user = match fetch_current_user(&state, &auth_user).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let service = ListingService::new(&state);
    match service.set_status(&user, listing_id, next_status).await {
        Ok(graph) => Json(graph.to_summary()).into_response(),
        Err(e) => e.into_response(),
    }
}
