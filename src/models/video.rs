// Listing video database model and lifecycle states
// SL-57: video readiness is driven entirely by provider webhook events

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::listing_videos;

/// Video lifecycle status.
///
/// `waiting → processing → ready | error`; the terminal states are set only
/// by the provider webhook. A video whose upload never completes stays
/// `waiting` indefinitely, which is acceptable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VideoStatus {
    Waiting,
    Processing,
    Ready,
    Error,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Waiting => "waiting",
            VideoStatus::Processing => "processing",
            VideoStatus::Ready => "ready",
            VideoStatus::Error => "error",
        }
    }

    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Ready | VideoStatus::Error)
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(VideoStatus::Waiting),
            "processing" => Ok(VideoStatus::Processing),
            "ready" => Ok(VideoStatus::Ready),
            "error" => Ok(VideoStatus::Error),
            _ => Err(format!("Invalid video status: {}", s)),
        }
    }
}

/// Video model representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = listing_videos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingVideo {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub provider_upload_id: Option<String>,
    pub provider_asset_id: Option<String>,
    pub playback_id: Option<String>,
    pub title: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New video for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listing_videos)]
pub struct NewListingVideo {
    pub listing_id: Uuid,
    pub provider_upload_id: Option<String>,
    pub title: Option<String>,
    pub status: String,
}

/// Video shape shared by owner and public projections
#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub playback_id: Option<String>,
    pub title: Option<String>,
    pub status: String,
}

impl From<&ListingVideo> for VideoResponse {
    fn from(video: &ListingVideo) -> Self {
        Self {
            id: video.id,
            playback_id: video.playback_id.clone(),
            title: video.title.clone(),
            status: video.status.clone(),
        }
    }
}

impl ListingVideo {
    pub fn status_enum(&self) -> VideoStatus {
        VideoStatus::from_str(&self.status).unwrap_or_else(|e| {
            tracing::warn!("Invalid video status for {}: {}", self.id, e);
            VideoStatus::Error
        })
    }

    /// All videos of a listing, oldest first
    pub async fn list_for_listing(
        conn: &mut AsyncPgConnection,
        parent_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::listing_videos::dsl::*;

        listing_videos
            .filter(listing_id.eq(parent_id))
            .order(created_at.asc())
            .load::<ListingVideo>(conn)
            .await
    }

    /// Video count for a listing
    pub async fn count_for_listing(
        conn: &mut AsyncPgConnection,
        parent_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::listing_videos::dsl::*;

        listing_videos
            .filter(listing_id.eq(parent_id))
            .count()
            .get_result(conn)
            .await
    }

    /// Find a video by id within a listing
    pub async fn find_in_listing(
        conn: &mut AsyncPgConnection,
        video_id: Uuid,
        parent_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::listing_videos::dsl::*;

        listing_videos
            .filter(id.eq(video_id))
            .filter(listing_id.eq(parent_id))
            .first::<ListingVideo>(conn)
            .await
            .optional()
    }

    /// Find a video by the provider's asset identifier
    pub async fn find_by_asset_id(
        conn: &mut AsyncPgConnection,
        asset_id: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::listing_videos::dsl::*;

        listing_videos
            .filter(provider_asset_id.eq(asset_id))
            .first::<ListingVideo>(conn)
            .await
            .optional()
    }

    /// Find a video by the provider's upload session identifier
    pub async fn find_by_upload_id(
        conn: &mut AsyncPgConnection,
        upload_id: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::listing_videos::dsl::*;

        listing_videos
            .filter(provider_upload_id.eq(upload_id))
            .first::<ListingVideo>(conn)
            .await
            .optional()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            VideoStatus::Waiting,
            VideoStatus::Processing,
            VideoStatus::Ready,
            VideoStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<VideoStatus>().unwrap(), status);
        }
        assert!("uploading".parse::<VideoStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(VideoStatus::Ready.is_terminal());
        assert!(VideoStatus::Error.is_terminal());
        assert!(!VideoStatus::Waiting.is_terminal());
        assert!(!VideoStatus::Processing.is_terminal());
    }
}
