// Hairstyle Studio: a thin web backend in front of Google Gemini and the
// LightX hairstyle API, plus the two browser pages that drive it.

use anyhow::Context;
use hairstyle_studio::{routes, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_address();

    tracing::info!(
        model = %config.gemini_model,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        public_dir = %config.public_dir.display(),
        "Configuration loaded"
    );

    let app = routes::app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("🚀 Server running on http://{}", addr);
    tracing::info!("💇 Open / for the transformer or /hairstyle-generator for text prompts");

    axum::serve(listener, app).await?;
    Ok(())
}
