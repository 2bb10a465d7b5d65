// Listing photo database model
// Position is a relative ordering key; gaps are allowed after deletions

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::listing_photos;

/// Photo model representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = listing_photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingPhoto {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub provider_image_id: String,
    pub url: String,
    pub thumbnail_url: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// New photo for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listing_photos)]
pub struct NewListingPhoto {
    pub listing_id: Uuid,
    pub provider_image_id: String,
    pub url: String,
    pub thumbnail_url: String,
    pub position: i32,
}

/// Photo shape shared by owner and public projections
#[derive(Debug, Clone, Serialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub url: String,
    pub thumbnail_url: String,
    pub position: i32,
}

impl From<&ListingPhoto> for PhotoResponse {
    fn from(photo: &ListingPhoto) -> Self {
        Self {
            id: photo.id,
            url: photo.url.clone(),
            thumbnail_url: photo.thumbnail_url.clone(),
            position: photo.position,
        }
    }
}

impl ListingPhoto {
    /// All photos of a listing ordered for display.
    /// Ties on position resolve by insertion order, keeping the sort stable.
    pub async fn list_ordered(
        conn: &mut AsyncPgConnection,
        parent_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::listing_photos::dsl::*;

        listing_photos
            .filter(listing_id.eq(parent_id))
            .order((position.asc(), created_at.asc()))
            .load::<ListingPhoto>(conn)
            .await
    }

    /// Photo count for a listing
    pub async fn count_for_listing(
        conn: &mut AsyncPgConnection,
        parent_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::listing_photos::dsl::*;

        listing_photos
            .filter(listing_id.eq(parent_id))
            .count()
            .get_result(conn)
            .await
    }

    /// Find a photo by id within a listing
    pub async fn find_in_listing(
        conn: &mut AsyncPgConnection,
        photo_id: Uuid,
        parent_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::listing_photos::dsl::*;

        listing_photos
            .filter(id.eq(photo_id))
            .filter(listing_id.eq(parent_id))
            .first::<ListingPhoto>(conn)
            .await
            .optional()
    }
}
