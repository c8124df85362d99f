use serde::{Deserialize, Serialize};

/// Body returned by `POST /transform-hairstyle`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransformResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TransformResponse {
    pub fn image(data_url: String) -> Self {
        Self {
            success: true,
            image: Some(data_url),
            message: None,
            text: None,
        }
    }

    pub fn text_only(text: String) -> Self {
        Self {
            success: false,
            image: None,
            message: Some("The API returned a text response instead of an image".to_string()),
            text: Some(text),
        }
    }
}

/// Body returned by `POST /generate-hairstyle`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub image_url: String,
    pub proxy_url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}
