//! Azure OpenAI integration.
//!
//! - `client`: `AzureClient`, the HTTP implementation of `Generator`.
//! - `retry`: `RetryPolicy` used around every model call.
//! - `models`: request/response wire types.
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::ImageOptions;
use crate::error::AppResult;

pub mod client;
pub mod models;
pub mod retry;

pub use client::AzureClient;
pub use retry::RetryPolicy;

/// Text and image generation as seen by the services.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Up to `n` image prompts about `topic`.
    async fn generate_prompts(&self, topic: &str, n: usize) -> AppResult<Vec<String>>;

    /// Generate one image for `prompt`, store it at `save_path` (or a default
    /// location) and return where it was written.
    async fn generate_image(
        &self,
        prompt: &str,
        save_path: Option<&Path>,
        options: &ImageOptions,
    ) -> AppResult<PathBuf>;
}
