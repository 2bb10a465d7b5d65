// Photo service - upload, ordering, and deletion
// SL-46: the 50-photo cap is checked before any provider call; reorder
// assigns position = submitted index and ignores foreign ids

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    app::AppState,
    db::DieselPool,
    models::{
        listing::Listing,
        photo::{ListingPhoto, NewListingPhoto},
    },
    services::image_host::ImageHost,
    utils::service_error::ServiceError,
};

/// Maximum photos per listing
pub const MAX_PHOTOS_PER_LISTING: i64 = 50;

/// Reject an upload when the listing is already at capacity.
/// Must run before the provider upload so a full listing costs no provider call.
pub fn ensure_photo_capacity(current_count: i64) -> Result<(), ServiceError> {
    if current_count >= MAX_PHOTOS_PER_LISTING {
        Err(ServiceError::LimitExceeded(format!(
            "Maximum {} photos per listing",
            MAX_PHOTOS_PER_LISTING
        )))
    } else {
        Ok(())
    }
}

/// Position for a newly appended photo: the current count, 0-based
pub fn next_position(current_count: i64) -> i32 {
    current_count as i32
}

/// Compute (photo id, new position) assignments for a reorder request.
/// Submitted ids that do not belong to the listing's photo set are skipped,
/// not errors; positions are the indexes in the submitted order.
pub fn order_assignments(
    listing_photo_ids: &HashSet<Uuid>,
    submitted_ids: &[Uuid],
) -> Vec<(Uuid, i32)> {
    submitted_ids
        .iter()
        .enumerate()
        .filter(|(_, id)| listing_photo_ids.contains(id))
        .map(|(index, id)| (*id, index as i32))
        .collect()
}

/// Capacity gate followed by the provider upload. The gate runs first, so a
/// listing at the cap never costs a provider call.
pub async fn admit_and_upload(
    current_count: i64,
    image_host: &dyn ImageHost,
    bytes: Vec<u8>,
    filename: String,
) -> Result<crate::services::image_host::UploadedImage, ServiceError> {
    ensure_photo_capacity(current_count)?;
    Ok(image_host.upload(bytes, filename).await?)
}

pub struct PhotoService {
    pool: DieselPool,
    image_host: Arc<dyn ImageHost>,
}

impl PhotoService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
            image_host: state.image_host.clone(),
        }
    }

    /// Upload a photo to an owned listing: capacity check, provider upload,
    /// then append at the end of the display order
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_photo(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        bytes: Vec<u8>,
        filename: String,
    ) -> Result<ListingPhoto, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let count = ListingPhoto::count_for_listing(&mut conn, listing.id).await?;

        // Provider failures propagate as the request's failure
        let uploaded = admit_and_upload(count, self.image_host.as_ref(), bytes, filename).await?;

        let new_photo = NewListingPhoto {
            listing_id: listing.id,
            provider_image_id: uploaded.provider_id,
            url: uploaded.url,
            thumbnail_url: uploaded.thumbnail_url,
            position: next_position(count),
        };

        let photo: ListingPhoto = {
            use crate::schema::listing_photos::dsl::*;
            diesel::insert_into(listing_photos)
                .values(&new_photo)
                .get_result(&mut conn)
                .await?
        };

        info!("Uploaded photo {} to listing {}", photo.id, listing.id);
        Ok(photo)
    }

    /// Reorder a listing's photos; returns the full set in display order
    #[instrument(skip(self, submitted_ids))]
    pub async fn reorder_photos(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        submitted_ids: &[Uuid],
    ) -> Result<Vec<ListingPhoto>, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let existing = ListingPhoto::list_ordered(&mut conn, listing.id).await?;
        let existing_ids: HashSet<Uuid> = existing.iter().map(|p| p.id).collect();
        let assignments = order_assignments(&existing_ids, submitted_ids);

        // All position writes commit together or not at all
        conn.build_transaction()
            .run::<_, diesel::result::Error, _>(|conn| {
                Box::pin(async move {
                    for (photo_id, new_position) in assignments {
                        use crate::schema::listing_photos::dsl::*;
                        diesel::update(listing_photos.filter(id.eq(photo_id)))
                            .set(position.eq(new_position))
                            .execute(conn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .await?;

        Ok(ListingPhoto::list_ordered(&mut conn, listing.id).await?)
    }

    /// Delete a photo: provider first, then the local record.
    /// A provider failure fails the request and keeps the record; a local
    /// failure after provider success is lossy cleanup, not compensated.
    #[instrument(skip(self))]
    pub async fn delete_photo(
        &self,
        owner_id: Uuid,
        listing_id: Uuid,
        photo_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let photo = ListingPhoto::find_in_listing(&mut conn, photo_id, listing.id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if let Err(e) = self.image_host.delete(&photo.provider_image_id).await {
            warn!(
                "Provider delete failed for photo {} (image {}): {}",
                photo.id, photo.provider_image_id, e
            );
            return Err(e.into());
        }

        {
            use crate::schema::listing_photos::dsl::*;
            diesel::delete(listing_photos.filter(id.eq(photo.id)))
                .execute(&mut conn)
                .await?;
        }

        // Remaining positions are not renumbered; only relative order matters
        info!("Deleted photo {} from listing {}", photo.id, listing.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_below_limit() {
        assert!(ensure_photo_capacity(0).is_ok());
        assert!(ensure_photo_capacity(49).is_ok());
    }

    #[test]
    fn test_capacity_at_limit() {
        let err = ensure_photo_capacity(50).unwrap_err();
        assert!(matches!(err, ServiceError::LimitExceeded(_)));
        assert!(ensure_photo_capacity(51).is_err());
    }

    #[test]
    fn test_next_position_appends() {
        assert_eq!(next_position(0), 0);
        assert_eq!(next_position(7), 7);
    }

    #[test]
    fn test_order_assignments_by_index() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let owned: HashSet<Uuid> = [p1, p2].into_iter().collect();

        // Swapping [p1, p2] -> [p2, p1] puts p2 at 0 and p1 at 1
        let assignments = order_assignments(&owned, &[p2, p1]);
        assert_eq!(assignments, vec![(p2, 0), (p1, 1)]);
    }

    #[test]
    fn test_order_assignments_ignores_foreign_ids() {
        let p1 = Uuid::new_v4();
        let foreign = Uuid::new_v4();
        let owned: HashSet<Uuid> = [p1].into_iter().collect();

        let assignments = order_assignments(&owned, &[foreign, p1]);
        assert_eq!(assignments, vec![(p1, 1)]);
    }
}
