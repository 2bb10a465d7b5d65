// Listing database model, status lifecycle, and owner-facing projections
// SL-44: projections operate on a fully materialized ListingGraph so that
// fetch strategy stays out of shape-mapping

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::models::agent::Agent;
use crate::models::photo::{ListingPhoto, PhotoResponse};
use crate::models::video::{ListingVideo, VideoResponse};
use crate::schema::listings;

/// Listing lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ListingStatus {
    Active,
    Archived,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Archived => "archived",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ListingStatus::Active),
            "archived" => Ok(ListingStatus::Archived),
            _ => Err(format!("Status must be 'active' or 'archived', got '{}'", s)),
        }
    }
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Listing model representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Listing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub agent_id: Uuid,
    pub slug: String,
    pub address: String,
    pub price: i64,
    pub beds: i32,
    pub baths: i32,
    pub sqft: i32,
    pub description: Option<String>,
    pub mls_number: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New listing for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub struct NewListing {
    pub user_id: Uuid,
    pub agent_id: Uuid,
    pub slug: String,
    pub address: String,
    pub price: i64,
    pub beds: i32,
    pub baths: i32,
    pub sqft: i32,
    pub description: Option<String>,
    pub mls_number: Option<String>,
    pub status: String,
}

/// Update listing fields
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = listings)]
pub struct UpdateListing {
    pub agent_id: Option<Uuid>,
    pub slug: Option<String>,
    pub address: Option<String>,
    pub price: Option<i64>,
    pub beds: Option<i32>,
    pub baths: Option<i32>,
    pub sqft: Option<i32>,
    pub description: Option<Option<String>>,
    pub mls_number: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn status_enum(&self) -> ListingStatus {
        ListingStatus::from_str(&self.status).unwrap_or_else(|e| {
            tracing::warn!("Invalid listing status for {}: {}", self.id, e);
            ListingStatus::Archived
        })
    }

    /// Find a listing by id, scoped to its owning account.
    /// A foreign listing id behaves exactly like a missing one.
    pub async fn find_owned(
        conn: &mut AsyncPgConnection,
        listing_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::listings::dsl::*;

        listings
            .filter(id.eq(listing_id))
            .filter(user_id.eq(owner_id))
            .first::<Listing>(conn)
            .await
            .optional()
    }

    /// Find an active listing by its public slug
    pub async fn find_active_by_slug(
        conn: &mut AsyncPgConnection,
        slug_value: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::listings::dsl::*;

        listings
            .filter(slug.eq(slug_value))
            .filter(status.eq(ListingStatus::Active.as_str()))
            .first::<Listing>(conn)
            .await
            .optional()
    }

    /// Count of active listings for an account; feeds the tier quota check
    pub async fn count_active_for_owner(
        conn: &mut AsyncPgConnection,
        owner_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::listings::dsl::*;

        listings
            .filter(user_id.eq(owner_id))
            .filter(status.eq(ListingStatus::Active.as_str()))
            .count()
            .get_result(conn)
            .await
    }
}

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Request to create a new listing
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateListingRequest {
    pub agent_id: Uuid,

    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,

    /// Price in minor currency units (cents)
    #[validate(range(min = 0, message = "Price must be non-negative"))]
    pub price: i64,

    #[validate(range(min = 0, message = "Beds must be non-negative"))]
    pub beds: i32,

    #[validate(range(min = 0, message = "Baths must be non-negative"))]
    pub baths: i32,

    #[validate(range(min = 0, message = "Sqft must be non-negative"))]
    pub sqft: i32,

    pub description: Option<String>,

    #[validate(length(max = 50, message = "MLS number must be less than 50 characters"))]
    pub mls_number: Option<String>,
}

/// Request to update an existing listing; all fields optional.
/// An address change re-derives the slug; the old slug is not preserved.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateListingRequest {
    pub agent_id: Option<Uuid>,

    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: Option<String>,

    #[validate(range(min = 0, message = "Price must be non-negative"))]
    pub price: Option<i64>,

    #[validate(range(min = 0, message = "Beds must be non-negative"))]
    pub beds: Option<i32>,

    #[validate(range(min = 0, message = "Baths must be non-negative"))]
    pub baths: Option<i32>,

    #[validate(range(min = 0, message = "Sqft must be non-negative"))]
    pub sqft: Option<i32>,

    pub description: Option<String>,

    #[validate(length(max = 50, message = "MLS number must be less than 50 characters"))]
    pub mls_number: Option<String>,
}

/// Request to transition a listing's status
#[derive(Debug, Clone, Deserialize)]
pub struct ListingStatusRequest {
    pub status: String,
}

/// Optional filters for the owner's listing index
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListListingsParams {
    pub status: Option<String>,
}

// =============================================================================
// MATERIALIZED GRAPH + OWNER PROJECTIONS
// =============================================================================

/// A listing together with everything its projections need, already fetched.
/// Photos must arrive ordered (position ascending, insertion order on ties).
#[derive(Debug, Clone)]
pub struct ListingGraph {
    pub listing: Listing,
    pub agent: Option<Agent>,
    pub photos: Vec<ListingPhoto>,
    pub videos: Vec<ListingVideo>,
}

/// Owner summary: base fields + agent name + first photo thumbnail
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub slug: String,
    pub address: String,
    pub price: i64,
    pub beds: i32,
    pub baths: i32,
    pub sqft: i32,
    pub description: Option<String>,
    pub mls_number: Option<String>,
    pub status: String,
    pub branded_url: String,
    pub unbranded_url: String,
    pub agent_name: Option<String>,
    pub first_photo_url: Option<String>,
}

/// Owner detail: summary + full ordered photo list + all videos
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetailResponse {
    #[serde(flatten)]
    pub summary: ListingResponse,
    pub photos: Vec<PhotoResponse>,
    pub videos: Vec<VideoResponse>,
}

/// Derived public page path for the branded view
pub fn branded_path(slug: &str) -> String {
    format!("/p/{}", slug)
}

/// Derived public page path for the unbranded/MLS view
pub fn unbranded_path(slug: &str) -> String {
    format!("/p/{}/mls", slug)
}

impl ListingGraph {
    /// Photos in display order: position ascending, stable on ties so that
    /// insertion order breaks them
    pub fn ordered_photos(&self) -> Vec<&ListingPhoto> {
        let mut photos: Vec<&ListingPhoto> = self.photos.iter().collect();
        photos.sort_by_key(|p| p.position);
        photos
    }

    /// Owner summary projection
    pub fn to_summary(&self) -> ListingResponse {
        let listing = &self.listing;
        ListingResponse {
            id: listing.id,
            agent_id: listing.agent_id,
            slug: listing.slug.clone(),
            address: listing.address.clone(),
            price: listing.price,
            beds: listing.beds,
            baths: listing.baths,
            sqft: listing.sqft,
            description: listing.description.clone(),
            mls_number: listing.mls_number.clone(),
            status: listing.status.clone(),
            branded_url: branded_path(&listing.slug),
            unbranded_url: unbranded_path(&listing.slug),
            agent_name: self.agent.as_ref().map(|a| a.name.clone()),
            first_photo_url: <[_]>::first(&self.ordered_photos())
                .map(|p| p.thumbnail_url.clone()),
        }
    }

    /// Owner detail projection: full photo ordering, videos of every status
    pub fn to_detail(&self) -> ListingDetailResponse {
        ListingDetailResponse {
            summary: self.to_summary(),
            photos: self
                .ordered_photos()
                .into_iter()
                .map(PhotoResponse::from)
                .collect(),
            videos: self.videos.iter().map(VideoResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "active".parse::<ListingStatus>().unwrap(),
            ListingStatus::Active
        );
        assert_eq!(
            "archived".parse::<ListingStatus>().unwrap(),
            ListingStatus::Archived
        );
        assert!("sold".parse::<ListingStatus>().is_err());
    }

    #[test]
    fn test_public_paths() {
        assert_eq!(branded_path("123-main-st"), "/p/123-main-st");
        assert_eq!(unbranded_path("123-main-st"), "/p/123-main-st/mls");
    }
}
