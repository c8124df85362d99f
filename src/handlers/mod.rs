pub mod generate_handler;
pub mod proxy_handler;
pub mod transform_handler;

pub async fn health_check_handler() -> &'static str {
    "OK"
}
