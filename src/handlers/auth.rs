// Authentication Handlers for the Shutterlist backend
// SL-31: signup, login, and current-account endpoints

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::user::{NewUser, SubscriptionTier, User, UserResponse},
    utils::{hash_password, service_error::ServiceError, trim_optional_field, verify_password},
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 255, message = "Business name must be less than 255 characters"))]
    pub business_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

// =============================================================================
// AUTHENTICATION HANDLERS
// =============================================================================

/// POST /auth/signup - Register a new photographer account
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ServiceError::from(e).into_response();
    }

    let email = request.email.trim().to_lowercase();

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return ServiceError::InternalError.into_response();
        },
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    let new_user = NewUser {
        email,
        password_hash,
        business_name: trim_optional_field(request.business_name.as_ref()),
        subscription_tier: SubscriptionTier::Free.as_str().to_string(),
    };

    match User::create(&mut conn, new_user).await {
        Ok(user) => (StatusCode::CREATED, Json(UserResponse::from(&user))).into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// POST /auth/login - Authenticate and return an access token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return ServiceError::Unauthorized.into_response();
    }

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    // A missing account and a wrong password produce the same response
    let user = match User::find_by_email(&mut conn, &email).await {
        Ok(user) => user,
        Err(_) => return ServiceError::Unauthorized.into_response(),
    };

    match verify_password(&request.password, &user.password_hash) {
        Ok(true) => {},
        Ok(false) => return ServiceError::Unauthorized.into_response(),
        Err(e) => {
            tracing::error!("Password verification failed for {}: {}", user.id, e);
            return ServiceError::InternalError.into_response();
        },
    }

    match state.jwt_service.issue_access_token(&user) {
        Ok(access_token) => Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.jwt_service.access_expiry(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Token issue failed for {}: {}", user.id, e);
            ServiceError::InternalError.into_response()
        },
    }
}

/// GET /auth/me - Current account
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let user_uuid = match Uuid::parse_str(&auth_user.user_id) {
        Ok(id) => id,
        Err(_) => return ServiceError::Unauthorized.into_response(),
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return ServiceError::DatabaseError(e.to_string()).into_response(),
    };

    match User::find_by_id(&mut conn, user_uuid).await {
        Ok(user) => Json(UserResponse::from(&user)).into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}
