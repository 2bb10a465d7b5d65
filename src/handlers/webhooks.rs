// Provider webhook receiver for video lifecycle events
// Events are matched on upload-session and asset identifiers; anything
// unmatched is acknowledged and ignored so the provider stops redelivering

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use ring::hmac;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    app::AppState,
    services::video::{parse_webhook_event, VideoService},
};

/// Header carrying the provider signature: `t=<unix>,v1=<hex hmac>`
const SIGNATURE_HEADER: &str = "mux-signature";

/// Verify an HMAC-SHA256 signature over `{timestamp}.{raw_body}`.
/// Returns false on any malformed header component.
pub fn verify_signature(secret: &str, header_value: &str, body: &[u8]) -> bool {
    let mut timestamp = None;
    let mut signature_hex = None;

    for part in header_value.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signature_hex = Some(value),
            _ => {},
        }
    }

    let (Some(timestamp), Some(signature_hex)) = (timestamp, signature_hex) else {
        return false;
    };

    let Some(signature) = decode_hex(signature_hex) else {
        return false;
    };

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let mut signed_payload = Vec::with_capacity(timestamp.len() + 1 + body.len());
    signed_payload.extend_from_slice(timestamp.as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(body);

    hmac::verify(&key, &signed_payload, &signature).is_ok()
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// POST /webhooks/video - provider event receiver
pub async fn video_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    // Signature verification is active only when a secret is configured
    let secret = &state.config.video_host.webhook_secret;
    if !secret.is_empty() {
        let header_value = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !verify_signature(secret, header_value, &body) {
            warn!("Rejected webhook with missing or invalid signature");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid signature", "status": 401})),
            )
                .into_response();
        }
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            // Acknowledge unparseable payloads; redelivery would not help
            debug!("Unparseable webhook payload: {}", e);
            return Json(json!({"status": "ok"})).into_response();
        },
    };

    let event = parse_webhook_event(&payload);

    let service = VideoService::new(&state);
    match service.apply_webhook_event(event).await {
        Ok(outcome) => {
            debug!("Webhook outcome: {:?}", outcome);
            Json(json!({"status": "ok"})).into_response()
        },
        Err(e) => {
            // A store failure is the one case the provider should retry
            warn!("Webhook processing failed: {}", e);
            e.into_response()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let mut payload = timestamp.as_bytes().to_vec();
        payload.push(b'.');
        payload.extend_from_slice(body);
        let tag = hmac::sign(&key, &payload);
        tag.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_valid_signature() {
        let secret = "whsec_test";
        let body = br#"{"type":"video.asset.ready"}"#;
        let signature = sign(secret, "1700000000", body);
        let header = format!("t=1700000000,v1={}", signature);

        assert!(verify_signature(secret, &header, body));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let secret = "whsec_test";
        let signature = sign(secret, "1700000000", b"original");
        let header = format!("t=1700000000,v1={}", signature);

        assert!(!verify_signature(secret, &header, b"tampered"));
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(!verify_signature("whsec_test", "", b"body"));
        assert!(!verify_signature("whsec_test", "t=123", b"body"));
        assert!(!verify_signature("whsec_test", "v1=zz", b"body"));
        assert!(!verify_signature("whsec_test", "t=123,v1=nothex!", b"body"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"payload";
        let signature = sign("secret-a", "1700000000", body);
        let header = format!("t=1700000000,v1={}", signature);

        assert!(!verify_signature("secret-b", &header, body));
    }
}
