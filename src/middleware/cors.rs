// CORS layer built from the configured origin whitelist
// A wildcard entry outside production allows any origin for local frontends

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::debug;

pub fn cors_layer() -> CorsLayer {
    let config = crate::app_config::config();

    let has_wildcard = config.cors_allowed_origins.iter().any(|o| o == "*");

    let allow_origin = if has_wildcard && !config.is_production() {
        debug!("CORS: wildcard origin enabled for non-production environment");
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter(|o| o.as_str() != "*")
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
