//! Env-driven configuration for the service and library.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binaries. Azure credentials are kept optional here and checked when
//! the Azure client is built, so commands that never reach the model still run
//! without them.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenv;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

/// Azure OpenAI connection settings.
#[derive(Clone, Debug, Default)]
pub struct AzureSettings {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub api_version: String,
    pub chat_deployment: Option<String>,
    pub image_deployment: Option<String>,
    pub embedding_deployment: Option<String>,
}

/// Size, quality and style passed to every image generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageOptions {
    pub size: String,
    pub quality: String,
    pub style: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        ImageOptions {
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            style: "natural".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub azure: AzureSettings,
    pub image: ImageOptions,
    pub data_dir: PathBuf,
    pub api_host: String,
    pub api_port: String,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let image_defaults = ImageOptions::default();
        Ok(Config {
            azure: AzureSettings {
                api_key: get("AZURE_OPENAI_API_KEY"),
                endpoint: get("AZURE_OPENAI_ENDPOINT"),
                api_version: or("AZURE_OPENAI_API_VERSION", DEFAULT_API_VERSION),
                chat_deployment: get("AZURE_OPENAI_GPT4_DEPLOYMENT"),
                image_deployment: get("AZURE_OPENAI_DALLE_DEPLOYMENT"),
                embedding_deployment: get("AZURE_OPENAI_EMBEDDING_DEPLOYMENT"),
            },
            image: ImageOptions {
                size: or("IMAGE_SIZE", &image_defaults.size),
                quality: or("IMAGE_QUALITY", &image_defaults.quality),
                style: or("IMAGE_STYLE", &image_defaults.style),
            },
            data_dir: PathBuf::from(or("DATA_DIR", "./data")),
            api_host: or("API_HOST", "127.0.0.1"),
            api_port: or("API_PORT", "8000"),
            max_retries: parse_or("MAX_RETRIES", get("MAX_RETRIES"), 3)?,
            retry_base_delay: Duration::from_millis(parse_or(
                "RETRY_BASE_DELAY_MS",
                get("RETRY_BASE_DELAY_MS"),
                1000,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                get("REQUEST_TIMEOUT_SECS"),
                30,
            )?),
        })
    }

    /// Log the effective configuration with secrets redacted.
    pub fn log_summary(&self) {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "<unset>".to_string());
        let api_key = if self.azure.api_key.is_some() { "<redacted>" } else { "<unset>" };
        tracing::info!(
            endpoint = %show(&self.azure.endpoint),
            api_key,
            api_version = %self.azure.api_version,
            chat_deployment = %show(&self.azure.chat_deployment),
            image_deployment = %show(&self.azure.image_deployment),
            embedding_deployment = %show(&self.azure.embedding_deployment),
            "Azure OpenAI settings"
        );
        tracing::info!(
            size = %self.image.size,
            quality = %self.image.quality,
            style = %self.image.style,
            data_dir = %self.data_dir.display(),
            max_retries = self.max_retries,
            "Image and storage settings"
        );
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> AppResult<T> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a non-negative integer, got '{}'", key, v))),
    }
}
