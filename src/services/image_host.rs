// Image hosting provider integration (Cloudflare Images)
// Listings never store image bytes; photos live with the provider and the
// database keeps opaque ids plus display URLs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, instrument};

use crate::app_config::ImageHostConfig;

#[derive(Error, Debug)]
pub enum ImageHostError {
    #[error("Image upload failed: {0}")]
    UploadFailed(String),

    #[error("Image delete failed: {0}")]
    DeleteFailed(String),

    #[error("Unexpected provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Result of a successful provider upload
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub provider_id: String,
    pub url: String,
    pub thumbnail_url: String,
}

/// Seam for the external image host. Production uses Cloudflare Images;
/// tests substitute a recording mock.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, filename: String)
        -> Result<UploadedImage, ImageHostError>;

    /// Best-effort provider-side delete; failures surface to the caller
    async fn delete(&self, provider_id: &str) -> Result<(), ImageHostError>;
}

// =============================================================================
// CLOUDFLARE IMAGES CLIENT
// =============================================================================

#[derive(Debug, Deserialize)]
struct CloudflareUploadResult {
    id: String,
    variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CloudflareEnvelope {
    result: CloudflareUploadResult,
}

/// Cloudflare Images client
#[derive(Clone)]
pub struct CloudflareImages {
    client: Arc<Client>,
    api_token: String,
    base_url: String,
}

impl CloudflareImages {
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_token: config.api_token.clone(),
            base_url: format!(
                "https://api.cloudflare.com/client/v4/accounts/{}/images/v1",
                config.account_id
            ),
        }
    }

    /// Variant URLs come back as `<base>/<variant-name>`; the stored display
    /// and thumbnail URLs are the `public` and `thumbnail` variants
    fn variant_urls(result: &CloudflareUploadResult) -> Result<(String, String), ImageHostError> {
        let first = result.variants.first().ok_or_else(|| {
            ImageHostError::MalformedResponse("upload result has no variants".to_string())
        })?;

        let base = first.rsplit_once('/').map(|(base, _)| base).ok_or_else(|| {
            ImageHostError::MalformedResponse(format!("unparseable variant URL: {}", first))
        })?;

        Ok((format!("{}/public", base), format!("{}/thumbnail", base)))
    }
}

#[async_trait]
impl ImageHost for CloudflareImages {
    #[instrument(skip(self, bytes), fields(filename = %filename, size = bytes.len()))]
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: String,
    ) -> Result<UploadedImage, ImageHostError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageHostError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Image upload rejected by provider: {} {}", status, body);
            return Err(ImageHostError::UploadFailed(format!(
                "provider returned {}",
                status
            )));
        }

        let envelope: CloudflareEnvelope = response
            .json()
            .await
            .map_err(|e| ImageHostError::MalformedResponse(e.to_string()))?;

        let (url, thumbnail_url) = Self::variant_urls(&envelope.result)?;

        Ok(UploadedImage {
            provider_id: envelope.result.id,
            url,
            thumbnail_url,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, provider_id: &str) -> Result<(), ImageHostError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.base_url, provider_id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ImageHostError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageHostError::DeleteFailed(format!(
                "provider returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_urls() {
        let result = CloudflareUploadResult {
            id: "abc".to_string(),
            variants: vec!["https://imagedelivery.net/acct/abc/public".to_string()],
        };
        let (url, thumb) = CloudflareImages::variant_urls(&result).unwrap();
        assert_eq!(url, "https://imagedelivery.net/acct/abc/public");
        assert_eq!(thumb, "https://imagedelivery.net/acct/abc/thumbnail");
    }

    #[test]
    fn test_variant_urls_empty() {
        let result = CloudflareUploadResult {
            id: "abc".to_string(),
            variants: vec![],
        };
        assert!(CloudflareImages::variant_urls(&result).is_err());
    }
}
