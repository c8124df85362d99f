use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use image::ImageFormat;

use crate::error::AppError;

/// An uploaded image held in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl ImagePayload {
    /// Keeps the declared media type when it names an image, otherwise
    /// sniffs the format from the bytes.
    pub fn new(
        bytes: Bytes,
        declared_type: Option<&str>,
        file_name: Option<String>,
    ) -> Result<Self, AppError> {
        let media_type = match declared_type.filter(|t| t.starts_with("image/")) {
            Some(declared) => declared.to_string(),
            None => sniff_media_type(&bytes)
                .ok_or_else(|| AppError::validation("Uploaded file is not a recognised image"))?
                .to_string(),
        };

        Ok(Self {
            bytes,
            media_type,
            file_name,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    let mime = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Avif => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Keeps axum's 413 for bodies over the upload limit; anything else is a
/// malformed request.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", err.body_text()))
    } else {
        AppError::validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

/// All parts of a multipart form, split into non-empty files and text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, ImagePayload>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            if file_name.is_some() {
                let data = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                if data.is_empty() {
                    continue;
                }
                let payload = ImagePayload::new(data, content_type.as_deref(), file_name)?;
                tracing::debug!(
                    field = %name,
                    file_name = payload.file_name.as_deref().unwrap_or(""),
                    size = payload.size(),
                    media_type = %payload.media_type,
                    "Received file"
                );
                form.files.entry(name).or_insert(payload);
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read {name}: {e}")))?;
                form.fields.entry(name).or_insert(text);
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImagePayload> {
        self.files.remove(name)
    }

    /// A trimmed text field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}
