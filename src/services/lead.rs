// Lead intake service
// SL-49: leads persist regardless of notification outcome; the email is a
// detached best-effort dispatch whose result only drives the notified flag

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    app::AppState,
    db::DieselPool,
    models::{
        agent::Agent,
        lead::{CreateLeadRequest, Lead, LeadResponse, NewLead},
        listing::Listing,
    },
    services::email::EmailService,
    utils::{service_error::ServiceError, trim_optional_field},
};

/// Result of the detached notification dispatch. Failures live here and
/// nowhere else; they are never surfaced to the submitting buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent,
    /// The agent has no contact email; no attempt was made
    Skipped,
    Failed,
}

impl NotificationOutcome {
    /// Only a successful attempt marks the lead notified
    pub fn notified(&self) -> bool {
        matches!(self, NotificationOutcome::Sent)
    }
}

pub struct LeadService {
    pool: DieselPool,
    email_service: Arc<EmailService>,
}

impl LeadService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
            email_service: state.email_service.clone(),
        }
    }

    /// Public lead submission against an active listing slug.
    ///
    /// The lead is persisted first; the notification attempt runs after and
    /// outside that write, and its failure never rolls anything back.
    #[instrument(skip(self, request), fields(slug = %slug))]
    pub async fn submit_lead(
        &self,
        slug: &str,
        request: CreateLeadRequest,
    ) -> Result<LeadResponse, ServiceError> {
        let mut conn = self.pool.get().await?;

        let listing = Listing::find_active_by_slug(&mut conn, slug)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let agent = {
            use crate::schema::agents::dsl::*;
            agents
                .filter(id.eq(listing.agent_id))
                .first::<Agent>(&mut conn)
                .await
                .optional()?
        };

        let new_lead = NewLead {
            listing_id: listing.id,
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            phone: trim_optional_field(request.phone.as_ref()),
            message: trim_optional_field(request.message.as_ref()),
        };

        let mut lead: Lead = {
            use crate::schema::leads::dsl::*;
            diesel::insert_into(leads)
                .values(&new_lead)
                .get_result(&mut conn)
                .await?
        };

        info!("Created lead {} for listing {}", lead.id, listing.id);

        let outcome = self.dispatch_notification(agent.as_ref(), &lead, &listing).await;

        if outcome.notified() {
            use crate::schema::leads::dsl::*;
            lead = diesel::update(leads.filter(id.eq(lead.id)))
                .set(notified.eq(true))
                .get_result(&mut conn)
                .await?;
        }

        Ok(LeadResponse::from_lead(&lead, Some(listing.address)))
    }

    /// One best-effort notification to the listing's agent. Skipped entirely
    /// when there is no contact email; errors are logged and absorbed.
    async fn dispatch_notification(
        &self,
        agent: Option<&Agent>,
        lead: &Lead,
        listing: &Listing,
    ) -> NotificationOutcome {
        let Some(agent) = agent else {
            return NotificationOutcome::Skipped;
        };
        let Some(agent_email) = agent.email.as_deref() else {
            return NotificationOutcome::Skipped;
        };

        match self
            .email_service
            .send_lead_notification(
                agent_email,
                &agent.name,
                &lead.name,
                &lead.email,
                lead.phone.as_deref(),
                lead.message.as_deref(),
                &listing.address,
            )
            .await
        {
            Ok(()) => NotificationOutcome::Sent,
            Err(e) => {
                warn!("Lead notification failed for lead {}: {}", lead.id, e);
                NotificationOutcome::Failed
            },
        }
    }

    /// All leads across an account's listings, newest first, each annotated
    /// with its parent listing's address at read time
    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<LeadResponse>, ServiceError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<(Lead, String)> = {
            use crate::schema::leads;
            use crate::schema::listings;

            leads::table
                .inner_join(listings::table)
                .filter(listings::user_id.eq(owner_id))
                .order(leads::created_at.desc())
                .select((Lead::as_select(), listings::address))
                .load(&mut conn)
                .await?
        };

        Ok(rows
            .into_iter()
            .map(|(lead, address)| LeadResponse::from_lead(&lead, Some(address)))
            .collect())
    }
}
