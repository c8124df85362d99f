use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::services::gemini_service::GeminiService;
use crate::services::lightx_service::LightXService;
use crate::services::relay_service::ImageRelay;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_LIGHTX_BASE_URL: &str = "https://api.lightxeditor.com/external/api";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub lightx_api_key: String,
    pub lightx_base_url: String,
    pub poll_interval: Duration,
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Result<Config> {
        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = parse_var("PORT", 3000u16)?;

        let gemini_api_key = required_var("GEMINI_API_KEY")?;
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let gemini_base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());

        let lightx_api_key = required_var("LIGHTX_API_KEY")?;
        let lightx_base_url =
            env::var("LIGHTX_BASE_URL").unwrap_or_else(|_| DEFAULT_LIGHTX_BASE_URL.to_string());

        let poll_interval = Duration::from_millis(parse_var(
            "POLL_INTERVAL_MS",
            DEFAULT_POLL_INTERVAL.as_millis() as u64,
        )?);
        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));
        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Config {
            server_host,
            server_port,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            lightx_api_key,
            lightx_base_url,
            poll_interval,
            public_dir,
            max_upload_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name).with_context(|| format!("{name} must be set in the environment"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(value)
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gemini_service: GeminiService,
    pub lightx_service: LightXService,
    pub image_relay: ImageRelay,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let client = reqwest::Client::new();

        Self {
            gemini_service: GeminiService::new(config.clone(), client.clone()),
            lightx_service: LightXService::new(config.clone(), client.clone()),
            image_relay: ImageRelay::new(client),
            config,
        }
    }
}
