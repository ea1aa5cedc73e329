use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::MediaSettings;

/// Errors that can occur when talking to the media CDN
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("CDN returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// An asset the CDN has accepted and is hosting.
#[derive(Debug, Clone, Deserialize)]
pub struct HostedImage {
    pub public_id: String,
    pub secure_url: String,
    pub width: i32,
    pub height: i32,
    pub format: String,
    pub bytes: i32,
}

/// Media CDN client.
///
/// The CDN does the heavy lifting: it fetches the source URL itself,
/// stores and transforms the asset, and serves derived renditions. This
/// client only registers and removes assets.
pub struct MediaClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl MediaClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Build a client from settings, or None when no CDN is configured.
    pub fn from_settings(settings: &MediaSettings) -> Option<Self> {
        match (&settings.base_url, &settings.api_key) {
            (Some(base_url), Some(api_key)) => {
                Some(Self::new(base_url.clone(), api_key.clone()))
            }
            _ => None,
        }
    }

    /// Ask the CDN to ingest a remote image and return the hosted asset.
    pub async fn ingest(&self, source_url: &str) -> Result<HostedImage, MediaError> {
        let public_id = format!("profiles/{}", Uuid::new_v4());
        let url = format!("{}/image/upload", self.base_url.trim_end_matches('/'));

        let payload = serde_json::json!({
            "file": source_url,
            "public_id": public_id,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::ApiError(format!(
                "upload failed: {}",
                response.status()
            )));
        }

        let hosted: HostedImage = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(format!("Failed to parse upload: {e}")))?;

        tracing::debug!("Ingested image {} ({} bytes)", hosted.public_id, hosted.bytes);

        Ok(hosted)
    }

    /// Remove an asset from the CDN.
    pub async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let url = format!(
            "{}/image/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(public_id)
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::ApiError(format!(
                "delete failed: {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Derived 300x300 face-cropped rendition for listing thumbnails.
    pub fn thumbnail_url(&self, public_id: &str) -> String {
        format!(
            "{}/image/w_300,h_300,c_fill,g_face/{}",
            self.base_url.trim_end_matches('/'),
            public_id
        )
    }
}
