// Video upload-target, status, and delete handlers
// SL-57: the backend never touches video bytes; the browser uploads straight
// to the provider using the returned URL

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    app::AppState,
    handlers::parse_user_id,
    middleware::auth::AuthenticatedUser,
    models::video::VideoResponse,
    services::video::VideoService,
};

#[derive(Debug, Default, Deserialize)]
pub struct VideoCreateRequest {
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoUploadResponse {
    pub video_id: Uuid,
    pub upload_url: String,
}

/// POST /listings/{id}/videos - create an upload target
pub async fn create_video_upload(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<Uuid>,
    request: Option<Json<VideoCreateRequest>>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let request = request.map(|Json(r)| r).unwrap_or_default();

    let service = VideoService::new(&state);
    match service.create_upload(owner_id, listing_id, request.title).await {
        Ok(upload) => (
            StatusCode::CREATED,
            Json(VideoUploadResponse {
                video_id: upload.video.id,
                upload_url: upload.upload_url,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /listings/{id}/videos/{video_id} - status poll
pub async fn get_video_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path((listing_id, video_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = VideoService::new(&state);
    match service.get_video(owner_id, listing_id, video_id).await {
        Ok(video) => Json(VideoResponse::from(&video)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// DELETE /listings/{id}/videos/{video_id}
pub async fn delete_video(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path((listing_id, video_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let service = VideoService::new(&state);
    match service.delete_video(owner_id, listing_id, video_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
