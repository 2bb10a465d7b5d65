// Listing service - business logic layer
// SL-42: owner-scoped CRUD, tier quota enforcement, slug assignment

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app::AppState,
    db::DieselPool,
    models::{
        agent::Agent,
        listing::{
            CreateListingRequest, ListListingsParams, Listing, ListingGraph, ListingStatus,
            NewListing, UpdateListing, UpdateListingRequest,
        },
        photo::ListingPhoto,
        user::User,
        video::ListingVideo,
    },
    services::{slug::SlugGenerator, subscription},
    utils::{service_error::ServiceError, trim_optional_field},
};

pub struct ListingService {
    pool: DieselPool,
    slug_generator: SlugGenerator,
}

impl ListingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
            slug_generator: SlugGenerator::new(state.diesel_pool.clone()),
        }
    }

    /// Create a listing: agent ownership, tier quota, then slug, then insert.
    /// New listings start active, so the quota check runs up front.
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn create_listing(
        &self,
        user: &User,
        request: CreateListingRequest,
    ) -> Result<ListingGraph, ServiceError> {
        let mut conn = self.pool.get().await?;

        // The referenced agent must belong to the caller; a foreign agent id
        // is indistinguishable from a missing one
        let agent = Agent::find_owned(&mut conn, request.agent_id, user.id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let active_count = Listing::count_active_for_owner(&mut conn, user.id).await?;
        subscription::check_activation(user.subscription_tier_enum(), active_count)?;

        let slug = self.slug_generator.unique_slug(&request.address).await?;

        let new_listing = NewListing {
            user_id: user.id,
            agent_id: agent.id,
            slug,
            address: request.address.trim().to_string(),
            price: request.price,
            beds: request.beds,
            baths: request.baths,
            sqft: request.sqft,
            description: trim_optional_field(request.description.as_ref()),
            mls_number: trim_optional_field(request.mls_number.as_ref()),
            status: ListingStatus::Active.as_str().to_string(),
        };

        let listing: Listing = {
            use crate::schema::listings::dsl::*;
            diesel::insert_into(listings)
                .values(&new_listing)
                .get_result(&mut conn)
                .await?
        };

        info!("Created listing {} ({})", listing.id, listing.slug);

        Ok(ListingGraph {
            listing,
            agent: Some(agent),
            photos: Vec::new(),
            videos: Vec::new(),
        })
    }

    /// All of an account's listings, optionally filtered by status, with the
    /// related agents and photos batch-loaded for the summary projection
    pub async fn list_listings(
        &self,
        owner_id: Uuid,
        params: &ListListingsParams,
    ) -> Result<Vec<ListingGraph>, ServiceError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<Listing> = {
            use crate::schema::listings::dsl::*;

            let mut query = listings.filter(user_id.eq(owner_id)).into_boxed();
            if let Some(filter) = &params.status {
                let parsed: ListingStatus = filter
                    .parse()
                    .map_err(ServiceError::ValidationError)?;
                query = query.filter(status.eq(parsed.as_str()));
            }
            query.order(created_at.desc()).load(&mut conn).await?
        };

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let agent_ids: Vec<Uuid> = rows.iter().map(|l| l.agent_id).collect();
        let agents_by_id: HashMap<Uuid, Agent> = {
            use crate::schema::agents::dsl::*;
            agents
                .filter(id.eq_any(&agent_ids))
                .load::<Agent>(&mut conn)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect()
        };

        let listing_ids: Vec<Uuid> = rows.iter().map(|l| l.id).collect();
        let mut photos_by_listing: HashMap<Uuid, Vec<ListingPhoto>> = HashMap::new();
        {
            use crate::schema::listing_photos::dsl::*;
            let all_photos: Vec<ListingPhoto> = listing_photos
                .filter(listing_id.eq_any(&listing_ids))
                .order((position.asc(), created_at.asc()))
                .load(&mut conn)
                .await?;
            for photo in all_photos {
                photos_by_listing
                    .entry(photo.listing_id)
                    .or_default()
                    .push(photo);
            }
        }

        Ok(rows
            .into_iter()
            .map(|listing| {
                // Listings can share an agent, so clone out of the map
                let agent = agents_by_id.get(&listing.agent_id).cloned();
                let photos = photos_by_listing.remove(&listing.id).unwrap_or_default();
                ListingGraph {
                    agent,
                    photos,
                    videos: Vec::new(),
                    listing,
                }
            })
            .collect())
    }

    /// Materialize the full graph for one owned listing
    pub async fn get_listing(
        &self,
        listing_id: Uuid,
        owner_id: Uuid,
    ) -> Result<ListingGraph, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Self::load_graph(&mut conn, listing).await
    }

    /// Materialize the full graph for an active listing by public slug
    pub async fn get_public_listing(&self, slug: &str) -> Result<ListingGraph, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_active_by_slug(&mut conn, slug)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Self::load_graph(&mut conn, listing).await
    }

    async fn load_graph(
        conn: &mut AsyncPgConnection,
        listing: Listing,
    ) -> Result<ListingGraph, ServiceError> {
        let agent = {
            use crate::schema::agents::dsl::*;
            agents
                .filter(id.eq(listing.agent_id))
                .first::<Agent>(conn)
                .await
                .optional()?
        };

        let photos = ListingPhoto::list_ordered(conn, listing.id).await?;
        let videos = ListingVideo::list_for_listing(conn, listing.id).await?;

        Ok(ListingGraph {
            listing,
            agent,
            photos,
            videos,
        })
    }

    /// Update an owned listing. An address change re-derives the slug; the
    /// old slug is released immediately.
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn update_listing(
        &self,
        user: &User,
        listing_id: Uuid,
        request: UpdateListingRequest,
    ) -> Result<ListingGraph, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, user.id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        // A new agent reference must also belong to the caller
        if let Some(next_agent_id) = request.agent_id {
            Agent::find_owned(&mut conn, next_agent_id, user.id)
                .await?
                .ok_or(ServiceError::NotFound)?;
        }

        let (address, slug) = match &request.address {
            Some(next_address) if next_address.trim() != listing.address => {
                let next = next_address.trim().to_string();
                let new_slug = self.slug_generator.unique_slug(&next).await?;
                (Some(next), Some(new_slug))
            },
            Some(next_address) => (Some(next_address.trim().to_string()), None),
            None => (None, None),
        };

        let changes = UpdateListing {
            agent_id: request.agent_id,
            slug,
            address,
            price: request.price,
            beds: request.beds,
            baths: request.baths,
            sqft: request.sqft,
            description: request
                .description
                .as_ref()
                .map(|d| trim_optional_field(Some(d))),
            mls_number: request
                .mls_number
                .as_ref()
                .map(|m| trim_optional_field(Some(m))),
            updated_at: Utc::now(),
        };

        let updated: Listing = {
            use crate::schema::listings::dsl::*;
            diesel::update(listings.filter(id.eq(listing.id)))
                .set(&changes)
                .get_result(&mut conn)
                .await?
        };

        Self::load_graph(&mut conn, updated).await
    }

    /// Delete an owned listing; photos, videos and leads cascade in the store
    pub async fn delete_listing(
        &self,
        listing_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        {
            use crate::schema::listings::dsl::*;
            diesel::delete(listings.filter(id.eq(listing.id)))
                .execute(&mut conn)
                .await?;
        }

        info!("Deleted listing {} ({})", listing.id, listing.slug);
        Ok(())
    }

    /// Transition a listing between active and archived. Activation counts
    /// against the tier quota; archiving never does.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn set_status(
        &self,
        user: &User,
        listing_id: Uuid,
        next_status: ListingStatus,
    ) -> Result<ListingGraph, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_owned(&mut conn, listing_id, user.id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if next_status == ListingStatus::Active && listing.status_enum() != ListingStatus::Active {
            let active_count = Listing::count_active_for_owner(&mut conn, user.id).await?;
            subscription::check_activation(user.subscription_tier_enum(), active_count)?;
        }

        let updated: Listing = {
            use crate::schema::listings::dsl::*;
            diesel::update(listings.filter(id.eq(listing.id)))
                .set((
                    status.eq(next_status.as_str()),
                    updated_at.eq(Utc::now()),
                ))
                .get_result(&mut conn)
                .await?
        };

        Self::load_graph(&mut conn, updated).await
    }
}
