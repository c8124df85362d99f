use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::AppError;
use crate::models::TransformResponse;
use crate::services::gemini_service::{GeminiService, TransformOutcome};
use crate::utils::multipart::UploadForm;

pub async fn transform_hairstyle_handler(
    State(gemini_service): State<GeminiService>,
    multipart: Multipart,
) -> Result<Json<TransformResponse>, AppError> {
    tracing::info!("Received transformation request");

    let mut form = UploadForm::read(multipart).await?;
    let (Some(user_image), Some(template_image)) =
        (form.take_file("userImage"), form.take_file("templateImage"))
    else {
        return Err(AppError::validation(
            "Both user image and template image are required",
        ));
    };

    tracing::info!(
        user_size = user_image.size(),
        user_type = %user_image.media_type,
        template_size = template_image.size(),
        template_type = %template_image.media_type,
        "Images received"
    );

    let response = match gemini_service
        .transform_hairstyle(&user_image, &template_image)
        .await?
    {
        TransformOutcome::Image(data_url) => TransformResponse::image(data_url),
        TransformOutcome::TextOnly(text) => TransformResponse::text_only(text),
    };

    Ok(Json(response))
}
