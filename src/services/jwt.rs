// JWT token service
// HS256 access tokens; a single token class keeps accounts signed in for a
// week, matching the session model of the product

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::User;

// Error types for JWT operations
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken => JwtError::InvalidToken,
            _ => JwtError::EncodingError(err.to_string()),
        }
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Account id
    pub sub: String,
    pub email: String,
    /// Subscription tier at issue time
    pub tier: String,
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
    pub aud: String,
    /// Token id
    pub jti: String,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub access_token_expiry: u64,
    pub algorithm: Algorithm,
    pub audience: String,
    pub issuer: String,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"<redacted>")
            .field("decoding_key", &"<redacted>")
            .finish()
    }
}

impl JwtConfig {
    fn build_from_params(secret: &str, expiry: u64, audience: String, issuer: String) -> Self {
        JwtConfig {
            access_token_expiry: expiry,
            algorithm: Algorithm::HS256,
            audience,
            issuer,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create JWT config from centralized app configuration
    pub fn from_env() -> Self {
        let crate::app_config::JwtConfig {
            access_secret,
            access_expiry,
            audience,
            issuer,
        } = &crate::app_config::config().jwt;

        Self::build_from_params(access_secret, *access_expiry, audience.clone(), issuer.clone())
    }

    /// Create JWT config for tests without touching the lazy static
    pub fn for_test() -> Self {
        Self::build_from_params(
            "test-access-secret-hs256-shutterlist",
            3600,
            "test.shutterlist.app".to_string(),
            "test.shutterlist.app".to_string(),
        )
    }
}

/// Issues and validates account access tokens
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Issue an access token for an account
    pub fn issue_access_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Self::now();

        let claims = AccessTokenClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            tier: user.subscription_tier.clone(),
            iat: now,
            exp: now + self.config.access_token_expiry,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.config.encoding_key,
        )
        .map_err(JwtError::from)
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);

        let data = decode::<AccessTokenClaims>(token, &self.config.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Seconds until a freshly issued token expires
    pub fn access_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "studio@example.com".to_string(),
            password_hash: "$argon2id$irrelevant".to_string(),
            business_name: Some("Studio Light".to_string()),
            subscription_tier: "free".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(JwtConfig::for_test());
        let user = test_user();

        let token = service.issue_access_token(&user).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.tier, "free");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new(JwtConfig::for_test());
        assert!(service.validate_access_token("not.a.token").is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issuer = JwtService::new(JwtConfig::build_from_params(
            "a-completely-different-32-byte-secret!!",
            3600,
            "test.shutterlist.app".to_string(),
            "test.shutterlist.app".to_string(),
        ));
        let verifier = JwtService::new(JwtConfig::for_test());

        let token = issuer.issue_access_token(&test_user()).unwrap();
        assert!(verifier.validate_access_token(&token).is_err());
    }
}
