pub mod api_model;
pub mod gemini_model;
pub mod lightx_model;

pub use api_model::{ErrorResponse, GenerateResponse, ProxyQuery, TransformResponse};
