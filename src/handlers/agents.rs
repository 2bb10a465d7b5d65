// Agent CRUD handlers
// All queries are scoped to the authenticated account; foreign ids 404

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    handlers::parse_user_id,
    middleware::auth::AuthenticatedUser,
    models::agent::{
        Agent, AgentResponse, CreateAgentRequest, NewAgent, UpdateAgent, UpdateAgentRequest,
    },
    utils::{service_error::ServiceError, trim_optional_field},
};

/// GET /agents - all agents of the authenticated account
pub async fn list_agents(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    match Agent::list_owned(&mut conn, owner_id).await {
        Ok(agents) => {
            let response: Vec<AgentResponse> = agents.iter().map(AgentResponse::from).collect();
            Json(response).into_response()
        },
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// POST /agents - create an agent
pub async fn create_agent(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateAgentRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    let new_agent = NewAgent {
        user_id: owner_id,
        name: request.name.trim().to_string(),
        email: trim_optional_field(request.email.as_ref()),
        phone: trim_optional_field(request.phone.as_ref()),
        brokerage_name: trim_optional_field(request.brokerage_name.as_ref()),
        photo_url: trim_optional_field(request.photo_url.as_ref()),
        brokerage_logo_url: trim_optional_field(request.brokerage_logo_url.as_ref()),
    };

    let result: Result<Agent, diesel::result::Error> = {
        use crate::schema::agents::dsl::*;
        diesel::insert_into(agents)
            .values(&new_agent)
            .get_result(&mut conn)
            .await
    };

    match result {
        Ok(agent) => (StatusCode::CREATED, Json(AgentResponse::from(&agent))).into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// GET /agents/{id}
pub async fn get_agent(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(agent_id): Path<Uuid>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    match Agent::find_owned(&mut conn, agent_id, owner_id).await {
        Ok(Some(agent)) => Json(AgentResponse::from(&agent)).into_response(),
        Ok(None) => ServiceError::NotFound.into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// PUT /agents/{id}
pub async fn update_agent(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(agent_id): Path<Uuid>,
    Json(request): Json<UpdateAgentRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    let existing = match Agent::find_owned(&mut conn, agent_id, owner_id).await {
        Ok(Some(agent)) => agent,
        Ok(None) => return ServiceError::NotFound.into_response(),
        Err(e) => return ServiceError::from(e).into_response(),
    };

    let changes = UpdateAgent {
        name: request.name.as_ref().map(|n| n.trim().to_string()),
        email: request.email.as_ref().map(|v| trim_optional_field(Some(v))),
        phone: request.phone.as_ref().map(|v| trim_optional_field(Some(v))),
        brokerage_name: request
            .brokerage_name
            .as_ref()
            .map(|v| trim_optional_field(Some(v))),
        photo_url: request
            .photo_url
            .as_ref()
            .map(|v| trim_optional_field(Some(v))),
        brokerage_logo_url: request
            .brokerage_logo_url
            .as_ref()
            .map(|v| trim_optional_field(Some(v))),
        updated_at: Utc::now(),
    };

    let result: Result<Agent, diesel::result::Error> = {
        use crate::schema::agents::dsl::*;
        diesel::update(agents.filter(id.eq(existing.id)))
            .set(&changes)
            .get_result(&mut conn)
            .await
    };

    match result {
        Ok(agent) => Json(AgentResponse::from(&agent)).into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// DELETE /agents/{id}
pub async fn delete_agent(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(agent_id): Path<Uuid>,
) -> impl IntoResponse {
    let owner_id = match parse_user_id(&auth_user) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    let existing = match Agent::find_owned(&mut conn, agent_id, owner_id).await {
        Ok(Some(agent)) => agent,
        Ok(None) => return ServiceError::NotFound.into_response(),
        Err(e) => return ServiceError::from(e).into_response(),
    };

    let result = {
        use crate::schema::agents::dsl::*;
        diesel::delete(agents.filter(id.eq(existing.id)))
            .execute(&mut conn)
            .await
    };

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}
