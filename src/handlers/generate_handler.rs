use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::AppError;
use crate::job::{proxy_url, strip_query};
use crate::models::GenerateResponse;
use crate::services::lightx_service::LightXService;
use crate::utils::multipart::UploadForm;
use crate::utils::request_origin::RequestOrigin;

pub async fn generate_hairstyle_handler(
    State(lightx_service): State<LightXService>,
    RequestOrigin(origin): RequestOrigin,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    tracing::info!("Received hairstyle generation request");

    let mut form = UploadForm::read(multipart).await?;
    let text_prompt = form.text("textPrompt").map(str::to_string);
    let (Some(user_image), Some(text_prompt)) = (form.take_file("userImage"), text_prompt) else {
        return Err(AppError::validation(
            "Both user image and text prompt are required",
        ));
    };

    tracing::info!(
        size = user_image.size(),
        media_type = %user_image.media_type,
        prompt = %text_prompt,
        "Request data"
    );

    let output = lightx_service
        .generate_hairstyle(&user_image, &text_prompt)
        .await?;

    let image_url = strip_query(&output).to_string();
    let proxy_url = proxy_url(&origin, &image_url);
    tracing::info!("Proxied image URL: {}", proxy_url);

    Ok(Json(GenerateResponse {
        success: true,
        image_url,
        proxy_url,
    }))
}
