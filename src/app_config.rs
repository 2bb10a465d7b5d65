// Centralized configuration management for the Shutterlist backend
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Access the global configuration
pub fn config() -> &'static AppConfig {
    &CONFIG
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub database_max_lifetime: u64,

    // Public site (property pages, email links)
    pub frontend_url: String,
    pub cors_allowed_origins: Vec<String>,

    // Feature toggles
    pub disable_embedded_migrations: bool,

    // Nested configs
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub image_host: ImageHostConfig,
    pub video_host: VideoHostConfig,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub access_expiry: u64,
    pub audience: String,
    pub issuer: String,
}

/// Email (Resend) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub resend_api_key: String,
    pub resend_api_url: String,
    pub from_email: String,
    pub from_name: String,
}

/// Image hosting (Cloudflare Images) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageHostConfig {
    pub account_id: String,
    pub api_token: String,
}

/// Video hosting (Mux) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoHostConfig {
    pub token_id: String,
    pub token_secret: String,
    /// HMAC secret for webhook signature verification; empty disables verification
    pub webhook_secret: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get required env var
        let get_required = |key: &str| -> Result<String, ConfigError> {
            env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
        };

        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // Helper function to parse env var with default
        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8080");
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));

        // JWT secret validation
        let jwt_access_secret = get_required("JWT_ACCESS_SECRET")?;
        if jwt_access_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "JWT_ACCESS_SECRET".to_string(),
                "Secret must be at least 32 characters long".to_string(),
            ));
        }

        let database_url = get_required("DATABASE_URL")?;
        let database_max_connections = parse_or_default("DATABASE_MAX_CONNECTIONS", "20")?;
        let database_min_connections = parse_or_default("DATABASE_MIN_CONNECTIONS", "2")?;
        let database_connect_timeout = parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "30")?;
        let database_idle_timeout = parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?;
        let database_max_lifetime = parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?;

        // Accounts stay signed in for a week
        let jwt_access_expiry = parse_u64_or_default("JWT_ACCESS_EXPIRY", "604800")?;
        let jwt_audience = get_or_default("JWT_AUDIENCE", "shutterlist.app");
        let jwt_issuer = get_or_default("JWT_ISSUER", "shutterlist.app");

        let frontend_url = get_or_default("FRONTEND_URL", "http://localhost:3000");
        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let disable_embedded_migrations =
            parse_bool_or_default("DISABLE_EMBEDDED_MIGRATIONS", "false");

        let rust_log = get_or_default("RUST_LOG", "info");

        let jwt = JwtConfig {
            access_secret: jwt_access_secret,
            access_expiry: jwt_access_expiry,
            audience: jwt_audience,
            issuer: jwt_issuer,
        };

        let email = EmailConfig {
            resend_api_key: get_or_default("RESEND_API_KEY", ""),
            resend_api_url: get_or_default("RESEND_API_URL", "https://api.resend.com/emails"),
            from_email: get_or_default("EMAIL_FROM_ADDRESS", "notifications@shutterlist.app"),
            from_name: get_or_default("EMAIL_FROM_NAME", "Shutterlist"),
        };

        let image_host = ImageHostConfig {
            account_id: get_or_default("CLOUDFLARE_ACCOUNT_ID", ""),
            api_token: get_or_default("CLOUDFLARE_API_TOKEN", ""),
        };

        let video_host = VideoHostConfig {
            token_id: get_or_default("MUX_TOKEN_ID", ""),
            token_secret: get_or_default("MUX_TOKEN_SECRET", ""),
            webhook_secret: get_or_default("VIDEO_WEBHOOK_SECRET", ""),
        };

        Ok(AppConfig {
            bind_address,
            port,
            environment,
            rust_log,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout,
            database_idle_timeout,
            database_max_lifetime,
            frontend_url,
            cors_allowed_origins,
            disable_embedded_migrations,
            jwt,
            email,
            image_host,
            video_host,
        })
    }

    /// Check whether we are running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from("production".to_string()),
            Environment::Production
        );
        assert_eq!(
            Environment::from("prod".to_string()),
            Environment::Production
        );
        assert_eq!(
            Environment::from("dev".to_string()),
            Environment::Development
        );
        assert_eq!(
            Environment::from("garbage".to_string()),
            Environment::Development
        );
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Staging.to_string(), "staging");
        assert_eq!(Environment::Test.to_string(), "test");
    }
}
