use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, get_service, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::AppState;
use crate::handlers::{
    generate_handler::generate_hairstyle_handler, health_check_handler,
    proxy_handler::image_proxy_handler, transform_handler::transform_hairstyle_handler,
};

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let public_dir = &state.config.public_dir;

    Router::new()
        .route(
            "/",
            get_service(ServeFile::new(public_dir.join("index.html"))),
        )
        .route(
            "/hairstyle-generator",
            get_service(ServeFile::new(public_dir.join("index2.html"))),
        )
        .route("/transform-hairstyle", post(transform_hairstyle_handler))
        .route("/generate-hairstyle", post(generate_hairstyle_handler))
        .route("/image-proxy", get(image_proxy_handler))
        .route("/health", get(health_check_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
}

/// The complete application, ready to serve.
pub fn app(state: AppState) -> Router {
    create_routes(&state).with_state(state)
}
