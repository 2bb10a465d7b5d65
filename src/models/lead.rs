// Buyer lead database model and DTOs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::schema::leads;

/// Lead model representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Lead {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}

/// New lead for insertion; `notified` defaults false until an attempt succeeds
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leads)]
pub struct NewLead {
    pub listing_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// Public request to submit a lead against an active listing
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 50, message = "Phone must be less than 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 5000, message = "Message must be less than 5000 characters"))]
    pub message: Option<String>,
}

/// Lead shape returned to the public submitter and to the owning account.
/// `listing_address` is resolved at read time via a join; it is absent when
/// the parent listing no longer exists.
#[derive(Debug, Clone, Serialize)]
pub struct LeadResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
    pub listing_address: Option<String>,
}

impl LeadResponse {
    pub fn from_lead(lead: &Lead, listing_address: Option<String>) -> Self {
        Self {
            id: lead.id,
            listing_id: lead.listing_id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            message: lead.message.clone(),
            notified: lead.notified,
            created_at: lead.created_at,
            listing_address,
        }
    }
}
