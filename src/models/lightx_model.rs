use serde::{Deserialize, Serialize};

/// Every LightX endpoint wraps its payload as `{statusCode, message, body}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightXEnvelope<T> {
    pub status_code: Option<u32>,
    pub message: Option<String>,
    pub body: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest<'a> {
    pub upload_type: &'a str,
    pub size: u64,
    pub content_type: &'a str,
}

/// A one-shot (write URL, read URL) pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    pub upload_image: String,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HairstyleRequest<'a> {
    pub image_url: &'a str,
    pub text_prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmission {
    pub order_id: String,
    pub max_retries_allowed: Option<u32>,
    pub avg_response_time_in_sec: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusRequest<'a> {
    pub order_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub output: Option<String>,
}
