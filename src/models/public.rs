// Public property-page projections
// The unbranded shape has no agent field at all: syndication consumers must
// not be able to recover agent identity by inspecting optional fields

use serde::Serialize;

use crate::models::agent::Agent;
use crate::models::listing::ListingGraph;
use crate::models::photo::PhotoResponse;
use crate::models::video::VideoResponse;

/// Agent contact/brand block shown on branded pages only
#[derive(Debug, Clone, Serialize)]
pub struct PublicAgentResponse {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub brokerage_name: Option<String>,
    pub photo_url: Option<String>,
    pub brokerage_logo_url: Option<String>,
}

impl From<&Agent> for PublicAgentResponse {
    fn from(agent: &Agent) -> Self {
        Self {
            name: agent.name.clone(),
            email: agent.email.clone(),
            phone: agent.phone.clone(),
            brokerage_name: agent.brokerage_name.clone(),
            photo_url: agent.photo_url.clone(),
            brokerage_logo_url: agent.brokerage_logo_url.clone(),
        }
    }
}

/// Branded property page: full listing data including the agent block
#[derive(Debug, Clone, Serialize)]
pub struct PublicListingResponse {
    pub slug: String,
    pub address: String,
    pub price: i64,
    pub beds: i32,
    pub baths: i32,
    pub sqft: i32,
    pub description: Option<String>,
    pub mls_number: Option<String>,
    pub photos: Vec<PhotoResponse>,
    pub videos: Vec<VideoResponse>,
    pub agent: Option<PublicAgentResponse>,
}

/// Unbranded/MLS property page: same data with the agent omitted entirely
#[derive(Debug, Clone, Serialize)]
pub struct PublicMlsListingResponse {
    pub slug: String,
    pub address: String,
    pub price: i64,
    pub beds: i32,
    pub baths: i32,
    pub sqft: i32,
    pub description: Option<String>,
    pub mls_number: Option<String>,
    pub photos: Vec<PhotoResponse>,
    pub videos: Vec<VideoResponse>,
}

/// Videos shown publicly: only those the provider has confirmed ready
fn ready_videos(graph: &ListingGraph) -> Vec<VideoResponse> {
    graph
        .videos
        .iter()
        .filter(|v| v.status == "ready")
        .map(VideoResponse::from)
        .collect()
}

impl ListingGraph {
    /// Public branded projection; caller must have checked the listing is active
    pub fn to_public_branded(&self) -> PublicListingResponse {
        let listing = &self.listing;
        PublicListingResponse {
            slug: listing.slug.clone(),
            address: listing.address.clone(),
            price: listing.price,
            beds: listing.beds,
            baths: listing.baths,
            sqft: listing.sqft,
            description: listing.description.clone(),
            mls_number: listing.mls_number.clone(),
            photos: self
                .ordered_photos()
                .into_iter()
                .map(PhotoResponse::from)
                .collect(),
            videos: ready_videos(self),
            agent: self.agent.as_ref().map(PublicAgentResponse::from),
        }
    }

    /// Public unbranded projection; caller must have checked the listing is active
    pub fn to_public_unbranded(&self) -> PublicMlsListingResponse {
        let listing = &self.listing;
        PublicMlsListingResponse {
            slug: listing.slug.clone(),
            address: listing.address.clone(),
            price: listing.price,
            beds: listing.beds,
            baths: listing.baths,
            sqft: listing.sqft,
            description: listing.description.clone(),
            mls_number: listing.mls_number.clone(),
            photos: self
                .ordered_photos()
                .into_iter()
                .map(PhotoResponse::from)
                .collect(),
            videos: ready_videos(self),
        }
    }
}
