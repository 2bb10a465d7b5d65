// Shared fixtures for integration tests
#![allow(dead_code)]

use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use shutterlist_backend::models::agent::Agent;
use shutterlist_backend::models::listing::{Listing, ListingGraph};
use shutterlist_backend::models::photo::ListingPhoto;
use shutterlist_backend::models::video::ListingVideo;
use shutterlist_backend::services::image_host::{ImageHost, ImageHostError, UploadedImage};

pub fn agent(user_id: Uuid) -> Agent {
    Agent {
        id: Uuid::new_v4(),
        user_id,
        name: "Dana Reyes".to_string(),
        email: Some("dana@reyesrealty.com".to_string()),
        phone: Some("555-0100".to_string()),
        brokerage_name: Some("Reyes Realty".to_string()),
        photo_url: Some("https://imagedelivery.net/acct/headshot/public".to_string()),
        brokerage_logo_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn listing(user_id: Uuid, agent_id: Uuid, status: &str) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        user_id,
        agent_id,
        slug: "123-main-street-austin-tx".to_string(),
        address: "123 Main Street, Austin TX".to_string(),
        price: 42_500_000,
        beds: 3,
        baths: 2,
        sqft: 1850,
        description: Some("Updated bungalow close to downtown.".to_string()),
        mls_number: Some("ATX-7781".to_string()),
        status: status.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A photo at an explicit position, created `age_order` ticks ago so that
/// insertion order is deterministic for tie-breaking
pub fn photo(listing_id: Uuid, position: i32, age_order: i64) -> ListingPhoto {
    ListingPhoto {
        id: Uuid::new_v4(),
        listing_id,
        provider_image_id: format!("img-{}", position),
        url: format!("https://imagedelivery.net/acct/img-{}/public", position),
        thumbnail_url: format!("https://imagedelivery.net/acct/img-{}/thumbnail", position),
        position,
        created_at: Utc::now() - Duration::seconds(1000 - age_order),
    }
}

pub fn video(listing_id: Uuid, status: &str, playback_id: Option<&str>) -> ListingVideo {
    ListingVideo {
        id: Uuid::new_v4(),
        listing_id,
        provider_upload_id: Some(format!("upload-{}", status)),
        provider_asset_id: Some(format!("asset-{}", status)),
        playback_id: playback_id.map(str::to_string),
        title: None,
        status: status.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A fully materialized graph: active listing, agent, two photos, one ready
/// and one processing video
pub fn graph() -> ListingGraph {
    let user_id = Uuid::new_v4();
    let the_agent = agent(user_id);
    let the_listing = listing(user_id, the_agent.id, "active");
    let photos = vec![
        photo(the_listing.id, 0, 0),
        photo(the_listing.id, 1, 1),
    ];
    let videos = vec![
        video(the_listing.id, "ready", Some("pb-1")),
        video(the_listing.id, "processing", None),
    ];
    ListingGraph {
        listing: the_listing,
        agent: Some(the_agent),
        photos,
        videos,
    }
}

/// Image host mock that records how often the provider was reached
#[derive(Default)]
pub struct RecordingImageHost {
    pub uploads: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl RecordingImageHost {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ImageHost for RecordingImageHost {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        _filename: String,
    ) -> Result<UploadedImage, ImageHostError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(UploadedImage {
            provider_id: "img-mock".to_string(),
            url: "https://imagedelivery.net/acct/img-mock/public".to_string(),
            thumbnail_url: "https://imagedelivery.net/acct/img-mock/thumbnail".to_string(),
        })
    }

    async fn delete(&self, _provider_id: &str) -> Result<(), ImageHostError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
