// Account (photographer) database model
// SL-41: subscription tier lookup for the listing quota check

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::users;

/// Subscription tier for a photographer account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubscriptionTier {
    /// $0/month - up to 5 simultaneously active listings
    Free,
    /// Unlimited active listings
    Paid,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Paid => "paid",
        }
    }

    /// Maximum simultaneously active listings for this tier.
    /// `None` means unlimited.
    pub fn max_active_listings(&self) -> Option<u32> {
        match self {
            SubscriptionTier::Free => Some(5),
            SubscriptionTier::Paid => None,
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionTier::Free),
            "paid" => Ok(SubscriptionTier::Paid),
            _ => Err(format!("Invalid subscription tier: {}", s)),
        }
    }
}

/// User database model - queryable from database
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub business_name: Option<String>,
    pub subscription_tier: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user for insertion
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub business_name: Option<String>,
    pub subscription_tier: String,
}

/// Errors for user operations
#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    DuplicateEmail,
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;
        use diesel::PgTextExpressionMethods;

        users
            .filter(email.ilike(email_str))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Create a new user
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_user: NewUser,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        diesel::insert_into(users)
            .values(&new_user)
            .get_result::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => UserError::DuplicateEmail,
                _ => UserError::Database(e),
            })
    }

    /// Get user's subscription tier as enum
    pub fn subscription_tier_enum(&self) -> SubscriptionTier {
        SubscriptionTier::from_str(&self.subscription_tier).unwrap_or_else(|e| {
            tracing::warn!(
                "Invalid subscription tier '{}' for user {}, defaulting to Free: {}",
                self.subscription_tier,
                self.id,
                e
            );
            SubscriptionTier::Free
        })
    }
}

/// Account shape returned from /auth/signup and /auth/me
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub business_name: Option<String>,
    pub subscription_tier: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            business_name: user.business_name.clone(),
            subscription_tier: user.subscription_tier.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parsing() {
        assert_eq!("free".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Free);
        assert_eq!("paid".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Paid);
        assert!("pro".parse::<SubscriptionTier>().is_err());
    }

    #[test]
    fn test_tier_limits() {
        assert_eq!(SubscriptionTier::Free.max_active_listings(), Some(5));
        assert_eq!(SubscriptionTier::Paid.max_active_listings(), None);
    }
}
