use axum::body::Bytes;
use reqwest::{header, Client};

use crate::error::AppError;

pub struct RelayedImage {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Fetches remote images on behalf of the browser.
#[derive(Clone)]
pub struct ImageRelay {
    client: Client,
}

impl ImageRelay {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<RelayedImage, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::RelayFailure(e.to_string()))?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::RelayFailure(e.to_string()))?;

        tracing::debug!(size = bytes.len(), %content_type, "Relayed {}", url);
        Ok(RelayedImage {
            content_type,
            bytes,
        })
    }
}
