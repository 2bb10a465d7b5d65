// Video hosting provider integration (Mux direct uploads)
// The backend only creates upload targets; bytes go browser -> provider,
// and readiness arrives later on the webhook

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, instrument};

use crate::app_config::VideoHostConfig;

#[derive(Error, Debug)]
pub enum VideoHostError {
    #[error("Upload target creation failed: {0}")]
    UploadTargetFailed(String),

    #[error("Unexpected provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A provider upload session: the browser PUTs the file to `upload_url`
#[derive(Debug, Clone)]
pub struct DirectUpload {
    pub upload_id: String,
    pub upload_url: String,
}

/// Seam for the external video host. Production uses Mux; tests substitute
/// a recording mock.
#[async_trait]
pub trait VideoHost: Send + Sync {
    async fn create_direct_upload(&self, cors_origin: &str)
        -> Result<DirectUpload, VideoHostError>;
}

// =============================================================================
// MUX CLIENT
// =============================================================================

#[derive(Debug, Deserialize)]
struct MuxUploadData {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct MuxEnvelope {
    data: MuxUploadData,
}

/// Mux direct-upload client
#[derive(Clone)]
pub struct MuxVideo {
    client: Arc<Client>,
    token_id: String,
    token_secret: String,
    api_url: String,
}

impl MuxVideo {
    pub fn new(config: &VideoHostConfig) -> Self {
        Self {
            client: Arc::new(Client::new()),
            token_id: config.token_id.clone(),
            token_secret: config.token_secret.clone(),
            api_url: "https://api.mux.com/video/v1/uploads".to_string(),
        }
    }
}

#[async_trait]
impl VideoHost for MuxVideo {
    #[instrument(skip(self))]
    async fn create_direct_upload(
        &self,
        cors_origin: &str,
    ) -> Result<DirectUpload, VideoHostError> {
        let payload = json!({
            "new_asset_settings": {
                "playback_policy": ["public"]
            },
            "cors_origin": cors_origin,
        });

        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .json(&payload)
            .send()
            .await
            .map_err(|e| VideoHostError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Upload target rejected by provider: {} {}", status, body);
            return Err(VideoHostError::UploadTargetFailed(format!(
                "provider returned {}",
                status
            )));
        }

        let envelope: MuxEnvelope = response
            .json()
            .await
            .map_err(|e| VideoHostError::MalformedResponse(e.to_string()))?;

        Ok(DirectUpload {
            upload_id: envelope.data.id,
            upload_url: envelope.data.url,
        })
    }
}
