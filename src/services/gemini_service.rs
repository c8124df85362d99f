use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;

use crate::config::Config;
use crate::error::AppError;
use crate::models::gemini_model::{
    Content, GeminiErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part,
};
use crate::utils::multipart::ImagePayload;

pub const TRANSFORM_PROMPT: &str = "Transform the hairstyle of the person in the first image to match the hairstyle in the second image. Make it look realistic.";

/// What a single `generateContent` round trip produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// `data:` URL of the returned image.
    Image(String),
    /// The model answered in text only.
    TextOnly(String),
}

#[derive(Clone)]
pub struct GeminiService {
    config: Arc<Config>,
    client: Client,
}

impl GeminiService {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.gemini_base_url.trim_end_matches('/'),
            self.config.gemini_model
        )
    }

    /// Asks the model to restyle `user` with the hairstyle shown in `template`.
    pub async fn transform_hairstyle(
        &self,
        user: &ImagePayload,
        template: &ImagePayload,
    ) -> Result<TransformOutcome, AppError> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::text(TRANSFORM_PROMPT),
                    Part::inline(&user.media_type, general_purpose::STANDARD.encode(&user.bytes)),
                    Part::inline(
                        &template.media_type,
                        general_purpose::STANDARD.encode(&template.bytes),
                    ),
                ],
            }],
            generation_config: GenerationConfig::default(),
        };

        tracing::info!(model = %self.config.gemini_model, "📤 Sending request to Google Gemini...");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.gemini_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::upstream(format!("Gemini response could not be read: {e}")))?;

        tracing::debug!(
            %status,
            "Gemini response: {}",
            body.chars().take(500).collect::<String>()
        );

        if !status.is_success() {
            let detail = serde_json::from_str::<GeminiErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error.message);
            return Err(AppError::upstream(
                detail.unwrap_or_else(|| format!("Gemini API error {status}")),
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::upstream(format!("Malformed Gemini response: {e}")))?;

        let outcome = extract_outcome(parsed)?;
        match &outcome {
            TransformOutcome::Image(_) => tracing::info!("✅ Found image data in response"),
            TransformOutcome::TextOnly(_) => tracing::warn!("No image data found in response"),
        }
        Ok(outcome)
    }
}

/// Picks the first inline image of the first candidate, or falls back to the
/// candidate's text.
fn extract_outcome(response: GenerateContentResponse) -> Result<TransformOutcome, AppError> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| AppError::upstream("Gemini returned no candidates"))?;

    if let Some(inline) = content.parts.iter().find_map(|p| p.inline_data.as_ref()) {
        return Ok(TransformOutcome::Image(format!(
            "data:{};base64,{}",
            inline.mime_type, inline.data
        )));
    }

    let text = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<String>();
    Ok(TransformOutcome::TextOnly(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn inline_image_becomes_data_url() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                    ]
                }
            }]
        }));

        assert_eq!(
            extract_outcome(response).unwrap(),
            TransformOutcome::Image("data:image/png;base64,iVBORw0KGgo=".into())
        );
    }

    #[test]
    fn text_parts_are_joined_when_no_image() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [ { "text": "I cannot " }, { "text": "edit images." } ] }
            }]
        }));

        assert_eq!(
            extract_outcome(response).unwrap(),
            TransformOutcome::TextOnly("I cannot edit images.".into())
        );
    }

    #[test]
    fn missing_candidates_is_an_upstream_failure() {
        let err = extract_outcome(parse(json!({ "candidates": [] }))).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UpstreamFailure);

        let err = extract_outcome(parse(json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "Gemini returned no candidates");
    }
}
