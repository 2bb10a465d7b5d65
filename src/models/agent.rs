// Agent database model and request/response DTOs
// Agents are owned by a photographer account and referenced by listings

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::schema::agents;

/// Agent model representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Agent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub brokerage_name: Option<String>,
    pub photo_url: Option<String>,
    pub brokerage_logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New agent for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agents)]
pub struct NewAgent {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub brokerage_name: Option<String>,
    pub photo_url: Option<String>,
    pub brokerage_logo_url: Option<String>,
}

/// Update agent fields
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = agents)]
pub struct UpdateAgent {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub brokerage_name: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
    pub brokerage_logo_url: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Request to create a new agent
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 50, message = "Phone must be less than 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Brokerage name must be less than 255 characters"))]
    pub brokerage_name: Option<String>,

    #[validate(url(message = "Invalid photo URL"))]
    pub photo_url: Option<String>,

    #[validate(url(message = "Invalid brokerage logo URL"))]
    pub brokerage_logo_url: Option<String>,
}

/// Request to update an existing agent; all fields optional
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAgentRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 50, message = "Phone must be less than 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Brokerage name must be less than 255 characters"))]
    pub brokerage_name: Option<String>,

    #[validate(url(message = "Invalid photo URL"))]
    pub photo_url: Option<String>,

    #[validate(url(message = "Invalid brokerage logo URL"))]
    pub brokerage_logo_url: Option<String>,
}

/// Agent response for owner-facing endpoints
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub brokerage_name: Option<String>,
    pub photo_url: Option<String>,
    pub brokerage_logo_url: Option<String>,
}

impl From<&Agent> for AgentResponse {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            email: agent.email.clone(),
            phone: agent.phone.clone(),
            brokerage_name: agent.brokerage_name.clone(),
            photo_url: agent.photo_url.clone(),
            brokerage_logo_url: agent.brokerage_logo_url.clone(),
        }
    }
}

// =============================================================================
// OWNER-SCOPED QUERIES
// =============================================================================

impl Agent {
    /// Find an agent by id, scoped to its owning account.
    /// A foreign agent id behaves exactly like a missing one.
    pub async fn find_owned(
        conn: &mut AsyncPgConnection,
        agent_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::agents::dsl::*;

        agents
            .filter(id.eq(agent_id))
            .filter(user_id.eq(owner_id))
            .first::<Agent>(conn)
            .await
            .optional()
    }

    /// List all agents owned by an account
    pub async fn list_owned(
        conn: &mut AsyncPgConnection,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::agents::dsl::*;

        agents
            .filter(user_id.eq(owner_id))
            .order(created_at.asc())
            .load::<Agent>(conn)
            .await
    }
}
