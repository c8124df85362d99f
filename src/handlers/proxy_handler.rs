use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::models::ProxyQuery;
use crate::services::relay_service::ImageRelay;

pub const CACHE_CONTROL_VALUE: &str = "public, max-age=86400";

pub async fn image_proxy_handler(
    State(image_relay): State<ImageRelay>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, AppError> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::validation("Image URL is required"))?;

    let image = image_relay.fetch(&url).await?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE.to_string()),
        ],
        image.bytes,
    )
        .into_response())
}
