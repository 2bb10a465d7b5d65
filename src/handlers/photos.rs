// Photo upload, reorder, and delete handlers
// SL-46: uploads arrive as multipart form data under the `file` field

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    app::AppState,
    handlers::parse_user_id,
    middleware::auth::AuthenticatedUser,
    models::photo::PhotoResponse,
    services::photo::PhotoService,
    utils::service_error::ServiceError,
};

#[derive(Debug, Deserialize)]
pub struct PhotoOrderRequest {
    pub photo_ids: Vec<Uuid>,
}

/// Pull the uploaded file out of a multipart body
async fn read_upload(multipart: &mut Multipart) -> Result<(Vec<u8>, String), ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::ValidationError(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("photo.jpg")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServiceError::ValidationError(format!("Failed to read upload: {}", e)))?
                .to_vec();

            if bytes.is_empty() {
                return Err(ServiceError::ValidationError(
                    "Uploaded file is empty".to_string(),
                ));
            }
            return Ok((bytes, filename));
        }
    }

    Err(ServiceError::ValidationError(
        "Missing 'file' field in multipart body".to_string(),
    ))
}

/// POST /listings/{id}/photos - upload a photo
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let (bytes, filename) = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return e.into_response(),
    };

    let service = PhotoService::new(&state);
    match service.upload_photo(owner_id, listing_id, bytes, filename).await {
        Ok(photo) => (StatusCode::CREATED, Json(PhotoResponse::from(&photo))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PUT /listings/{id}/photos/order - reorder photos
pub async fn reorder_photos(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<Uuid>,
    Json(request): Json<PhotoOrderRequest>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = PhotoService::new(&state);
    match service
        .reorder_photos(owner_id, listing_id, &request.photo_ids)
        .await
    {
        Ok(photos) => {
            let response: Vec<PhotoResponse> = photos.iter().map(PhotoResponse::from).collect();
            Json(response).into_response()
        },
        Err(e) => e.into_response(),
    }
}

/// DELETE /listings/{id}/photos/{photo_id}
pub async fn delete_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path((listing_id, photo_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = PhotoService::new(&state);
    match service.delete_photo(owner_id, listing_id, photo_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
