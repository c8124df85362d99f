use axum::{
    async_trait,
    extract::{FromRequestParts, Host},
    http::request::Parts,
};

use crate::error::AppError;

/// `scheme://host` of the incoming request, used to build same-origin links.
///
/// The scheme comes from `X-Forwarded-Proto` when a proxy sets it and is
/// `http` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Host(host) = Host::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Request is missing a Host header"))?;

        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http");

        Ok(RequestOrigin(format!("{scheme}://{host}")))
    }
}
