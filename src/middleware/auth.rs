// Authenticated account extracted from a validated bearer token

use serde::{Deserialize, Serialize};

/// Authenticated account information extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub token_id: String,
    pub email: String,
    pub subscription_tier: String,
    pub exp: u64,
}
