pub mod multipart;
pub mod request_origin;
