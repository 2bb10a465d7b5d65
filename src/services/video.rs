// Video service - upload targets and webhook-driven lifecycle
// SL-57: readiness and errors arrive only via provider webhook events,
// matched on upload-session id first and asset id thereafter

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    app::AppState,
    db::DieselPool,
    models::{
        listing::Listing,
        video::{ListingVideo, NewListingVideo, VideoStatus},
    },
    services::video_host::VideoHost,
    utils::{service_error::ServiceError, trim_optional_field},
};

/// Maximum videos per listing
pub const MAX_VIDEOS_PER_LISTING: i64 = 2;

/// Reject creation when the listing is already at capacity.
/// Runs before the provider call so a full listing costs nothing upstream.
pub fn ensure_video_capacity(current_count: i64) -> Result<(), ServiceError> {
    if current_count >= MAX_VIDEOS_PER_LISTING {
        Err(ServiceError::LimitExceeded(format!(
            "Maximum {} videos per listing",
            MAX_VIDEOS_PER_LISTING
        )))
    } else {
        Ok(())
    }
}

// =============================================================================
// WEBHOOK EVENTS
// =============================================================================

/// Provider webhook events this system reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoEvent {
    /// The uploaded file became an asset; links the upload session to it
    UploadAssetCreated { upload_id: String, asset_id: String },
    /// The asset finished processing and can be played back
    AssetReady {
        asset_id: String,
        playback_id: Option<String>,
    },
    /// The asset failed processing
    AssetErrored { asset_id: String },
    /// Anything else the provider sends; accepted and ignored
    Unrecognized,
}

/// Parse a provider webhook payload into an event.
/// Malformed or unknown payloads are `Unrecognized`, never errors: the
/// receiver answers 200 regardless.
pub fn parse_webhook_event(body: &Value) -> VideoEvent {
    let event_type = body.get("type").and_then(Value::as_str).unwrap_or("");
    let data = body.get("data").cloned().unwrap_or(Value::Null);

    match event_type {
        "video.upload.asset_created" => {
            let upload_id = data.get("id").and_then(Value::as_str);
            let asset_id = data.get("asset_id").and_then(Value::as_str);
            match (upload_id, asset_id) {
                (Some(upload_id), Some(asset_id)) => VideoEvent::UploadAssetCreated {
                    upload_id: upload_id.to_string(),
                    asset_id: asset_id.to_string(),
                },
                _ => VideoEvent::Unrecognized,
            }
        },
        "video.asset.ready" => match data.get("id").and_then(Value::as_str) {
            Some(asset_id) => VideoEvent::AssetReady {
                asset_id: asset_id.to_string(),
                playback_id: data
                    .get("playback_ids")
                    .and_then(Value::as_array)
                    .and_then(|ids| <[_]>::first(ids))
                    .and_then(|entry| entry.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            None => VideoEvent::Unrecognized,
        },
        "video.asset.errored" => match data.get("id").and_then(Value::as_str) {
            Some(asset_id) => VideoEvent::AssetErrored {
                asset_id: asset_id.to_string(),
            },
            None => VideoEvent::Unrecognized,
        },
        _ => VideoEvent::Unrecognized,
    }
}

/// What applying a webhook event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Applied,
    /// No matching video, terminal state, or unrecognized event
    Ignored,
}

// =============================================================================
// VIDEO SERVICE
// =============================================================================

pub struct VideoService {
    pool: DieselPool,
    video_host: Arc<dyn VideoHost>,
    cors_origin: String,
}

/// A freshly created video together with where the browser should upload
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub video: ListingVideo,
    pub upload_url: String,
}

impl VideoService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
            video_host: state.video_host.clone(),
            cors_origin: state.config.frontend_url.clone(),
        }
    }

    /// Create an upload target for an owned listing. The video row stores the
    /// provider upload-session id so later webhook events can find it.
    #[instrument(skip(self, title))]
    pub async fn create_upload(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        title: Option<String>,
    ) -> Result<VideoUpload, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let count = ListingVideo::count_for_listing(&mut conn, listing.id).await?;
        ensure_video_capacity(count)?;

        let upload = self.video_host.create_direct_upload(&self.cors_origin).await?;

        let new_video = NewListingVideo {
            listing_id: listing.id,
            provider_upload_id: Some(upload.upload_id),
            title: trim_optional_field(title.as_ref()),
            status: VideoStatus::Waiting.as_str().to_string(),
        };

        let video: ListingVideo = {
            use crate::schema::listing_videos::dsl::*;
            diesel::insert_into(listing_videos)
                .values(&new_video)
                .get_result(&mut conn)
                .await?
        };

        info!("Created video {} for listing {}", video.id, listing.id);

        Ok(VideoUpload {
            video,
            upload_url: upload.upload_url,
        })
    }

    /// Status poll for one video of an owned listing
    pub async fn get_video(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        video_id: Uuid,
    ) -> Result<ListingVideo, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        ListingVideo::find_in_listing(&mut conn, video_id, listing.id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Delete a video record of an owned listing
    pub async fn delete_video(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        video_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let video = ListingVideo::find_in_listing(&mut conn, video_id, listing.id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        {
            use crate::schema::listing_videos::dsl::*;
            diesel::delete(listing_videos.filter(id.eq(video.id)))
                .execute(&mut conn)
                .await?;
        }

        info!("Deleted video {} from listing {}", video.id, listing.id);
        Ok(())
    }

    /// Apply a provider webhook event. Unmatched identifiers and repeated
    /// terminal events are ignored; the receiver still answers 200.
    #[instrument(skip(self, event))]
    pub async fn apply_webhook_event(&self, event: VideoEvent) -> Result<WebhookOutcome, ServiceError> {
        let mut conn = self.pool.get().await?;

        match event {
            VideoEvent::UploadAssetCreated {
                upload_id,
                asset_id,
            } => {
                let Some(video) = ListingVideo::find_by_upload_id(&mut conn, &upload_id).await?
                else {
                    debug!("No video for upload session {}", upload_id);
                    return Ok(WebhookOutcome::Ignored);
                };

                if video.status_enum().is_terminal() {
                    return Ok(WebhookOutcome::Ignored);
                }

                {
                    use crate::schema::listing_videos::dsl::*;
                    diesel::update(listing_videos.filter(id.eq(video.id)))
                        .set((
                            provider_asset_id.eq(Some(asset_id.clone())),
                            status.eq(VideoStatus::Processing.as_str()),
                            updated_at.eq(Utc::now()),
                        ))
                        .execute(&mut conn)
                        .await?;
                }

                info!("Linked video {} to asset {}", video.id, asset_id);
                Ok(WebhookOutcome::Applied)
            },
            VideoEvent::AssetReady {
                asset_id,
                playback_id: new_playback_id,
            } => {
                let Some(video) = ListingVideo::find_by_asset_id(&mut conn, &asset_id).await?
                else {
                    debug!("No video for asset {}", asset_id);
                    return Ok(WebhookOutcome::Ignored);
                };

                // ready and error are terminal
                if video.status_enum().is_terminal() {
                    warn!("Ignoring ready event for terminal video {}", video.id);
                    return Ok(WebhookOutcome::Ignored);
                }

                {
                    use crate::schema::listing_videos::dsl::*;
                    diesel::update(listing_videos.filter(id.eq(video.id)))
                        .set((
                            status.eq(VideoStatus::Ready.as_str()),
                            playback_id.eq(new_playback_id),
                            updated_at.eq(Utc::now()),
                        ))
                        .execute(&mut conn)
                        .await?;
                }

                info!("Video {} is ready", video.id);
                Ok(WebhookOutcome::Applied)
            },
            VideoEvent::AssetErrored { asset_id } => {
                let Some(video) = ListingVideo::find_by_asset_id(&mut conn, &asset_id).await?
                else {
                    debug!("No video for asset {}", asset_id);
                    return Ok(WebhookOutcome::Ignored);
                };

                if video.status_enum().is_terminal() {
                    return Ok(WebhookOutcome::Ignored);
                }

                {
                    use crate::schema::listing_videos::dsl::*;
                    diesel::update(listing_videos.filter(id.eq(video.id)))
                        .set((
                            status.eq(VideoStatus::Error.as_str()),
                            updated_at.eq(Utc::now()),
                        ))
                        .execute(&mut conn)
                        .await?;
                }

                warn!("Video {} errored at the provider", video.id);
                Ok(WebhookOutcome::Applied)
            },
            VideoEvent::Unrecognized => Ok(WebhookOutcome::Ignored),
        }
    }
}
