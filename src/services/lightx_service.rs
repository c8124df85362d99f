use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::job::{self, PollPolicy, StatusSource};
use crate::models::lightx_model::{
    HairstyleRequest, JobSubmission, LightXEnvelope, OrderStatus, OrderStatusRequest,
    UploadSlot, UploadUrlRequest,
};
use crate::utils::multipart::ImagePayload;

const UPLOAD_URL_PATH: &str = "/v2/uploadImageUrl";
const HAIRSTYLE_PATH: &str = "/v1/hairstyle";
const ORDER_STATUS_PATH: &str = "/v1/order-status";

/// Client for the LightX hairstyle API.
#[derive(Clone)]
pub struct LightXService {
    config: Arc<Config>,
    client: Client,
}

impl LightXService {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.lightx_base_url.trim_end_matches('/'), path)
    }

    /// POSTs `body` to a LightX endpoint and unwraps the `body` field of the
    /// envelope. Every failure is reported as `failure`, with the provider's
    /// message appended when it sent one.
    async fn call<B, T>(&self, path: &str, body: &B, failure: &str) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .header("x-api-key", &self.config.lightx_api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(path, "LightX request failed: {}", e);
                AppError::upstream(failure)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(path, "LightX response could not be read: {}", e);
            AppError::upstream(failure)
        })?;

        if !status.is_success() {
            tracing::error!(path, %status, "LightX error: {}", text);
            let detail = serde_json::from_str::<LightXEnvelope<serde_json::Value>>(&text)
                .ok()
                .and_then(|e| e.message);
            return Err(AppError::upstream_with_detail(failure, detail.as_deref()));
        }

        let envelope = serde_json::from_str::<LightXEnvelope<T>>(&text).map_err(|e| {
            tracing::error!(path, "Malformed LightX response: {} ({})", e, text);
            AppError::upstream(failure)
        })?;

        envelope.body.ok_or_else(|| {
            tracing::error!(path, status_code = ?envelope.status_code, "LightX response has no body");
            AppError::upstream_with_detail(failure, envelope.message.as_deref())
        })
    }

    /// Step 1: reserve a write destination and the matching read URL.
    pub async fn reserve_upload_slot(&self, image: &ImagePayload) -> Result<UploadSlot, AppError> {
        let request = UploadUrlRequest {
            upload_type: "imageUrl",
            size: image.size(),
            content_type: &image.media_type,
        };
        let slot: UploadSlot = self
            .call(UPLOAD_URL_PATH, &request, "Failed to get image upload URL")
            .await?;
        tracing::info!("Upload URL received: {}", slot.upload_image);
        Ok(slot)
    }

    /// Step 2: PUT the raw bytes to the reserved destination.
    pub async fn upload_image(&self, slot: &UploadSlot, image: &ImagePayload) -> Result<(), AppError> {
        let response = self
            .client
            .put(&slot.upload_image)
            .header(header::CONTENT_TYPE, &image.media_type)
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Error uploading image: {}", e);
                AppError::upstream("Failed to upload image")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Error uploading image: {}", text);
            return Err(AppError::upstream("Failed to upload image"));
        }

        tracing::info!(size = image.size(), "Image uploaded successfully");
        Ok(())
    }

    /// Step 3: submit the generation job.
    pub async fn submit_hairstyle(
        &self,
        image_url: &str,
        text_prompt: &str,
    ) -> Result<JobSubmission, AppError> {
        let request = HairstyleRequest {
            image_url,
            text_prompt,
        };
        let submission: JobSubmission = self
            .call(HAIRSTYLE_PATH, &request, "Failed to generate hairstyle")
            .await?;
        tracing::info!(
            max_retries = ?submission.max_retries_allowed,
            avg_response_secs = ?submission.avg_response_time_in_sec,
            "Generation request sent, order ID: {}",
            submission.order_id
        );
        Ok(submission)
    }

    /// Runs the whole workflow and returns the provider's output URL.
    pub async fn generate_hairstyle(
        &self,
        image: &ImagePayload,
        text_prompt: &str,
    ) -> Result<String, AppError> {
        tracing::info!("Getting image upload URL...");
        let slot = self.reserve_upload_slot(image).await?;

        tracing::info!("Uploading image...");
        self.upload_image(&slot, image).await?;

        tracing::info!("Generating hairstyle...");
        let submission = self.submit_hairstyle(&slot.image_url, text_prompt).await?;

        let policy = PollPolicy::new(self.config.poll_interval, submission.max_retries_allowed);
        job::poll_until_terminal(self, &submission.order_id, policy).await
    }
}

#[async_trait]
impl StatusSource for LightXService {
    /// Step 4: one status check.
    async fn order_status(&self, order_id: &str) -> Result<OrderStatus, AppError> {
        self.call(
            ORDER_STATUS_PATH,
            &OrderStatusRequest { order_id },
            "Failed to check order status",
        )
        .await
    }
}
