//! HTTP client for Azure OpenAI deployments.
//!
//! - `generate_prompts` posts to `<deployment>/chat/completions`.
//! - `generate_image` posts to `<deployment>/images/generations`, downloads the
//!   returned URL and checks the file before handing back its path.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use uuid::Uuid;

use crate::azure::models::{
    ChatMessage, ChatRequest, ChatResponse, ImageGenerationRequest, ImageGenerationResponse,
};
use crate::azure::{Generator, RetryPolicy};
use crate::config::{Config, ImageOptions};
use crate::error::{AppError, AppResult};
use crate::utils::image_check::validate_image;
use crate::utils::paths::PathManager;

pub const MIN_TOPIC_LEN: usize = 3;
pub const MIN_IMAGE_PROMPT_LEN: usize = 10;
pub const MAX_PROMPTS: usize = 20;

const CHAT_MAX_TOKENS: u32 = 500;
const CHAT_TEMPERATURE: f32 = 0.9;

#[derive(Clone)]
pub struct AzureClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    chat_deployment: String,
    image_deployment: String,
    retry: RetryPolicy,
    ingest_dir: PathBuf,
}

fn required(value: &Option<String>, name: &str) -> AppResult<String> {
    value
        .clone()
        .ok_or_else(|| AppError::Config(format!("Missing required configuration: {}", name)))
}

impl AzureClient {
    /// Build a client from `config`. Fails if any credential or deployment
    /// name is missing.
    pub fn new(config: &Config, paths: &PathManager) -> AppResult<Self> {
        let azure = &config.azure;
        let api_key = required(&azure.api_key, "AZURE_OPENAI_API_KEY")?;
        let endpoint = required(&azure.endpoint, "AZURE_OPENAI_ENDPOINT")?;
        let chat_deployment = required(&azure.chat_deployment, "AZURE_OPENAI_GPT4_DEPLOYMENT")?;
        let image_deployment = required(&azure.image_deployment, "AZURE_OPENAI_DALLE_DEPLOYMENT")?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(AzureClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            api_version: azure.api_version.clone(),
            chat_deployment,
            image_deployment,
            retry: RetryPolicy::new(config.max_retries, config.retry_base_delay),
            ingest_dir: paths.ingest_dir(),
        })
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!("{}/openai/deployments/{}/{}", self.endpoint, deployment, operation)
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        if response.status().is_success() {
            response.json().await.map_err(AppError::HttpClient)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            Err(AppError::Upstream(format!(
                "Azure OpenAI request failed. Status: {}, Body: {}",
                status, error_body
            )))
        }
    }

    async fn download(&self, url: &str, save_path: &Path) -> AppResult<()> {
        let response = self.client.get(url).send().await.map_err(AppError::HttpClient)?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(AppError::Upstream(format!(
                "Failed to download image: {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await.map_err(AppError::HttpClient)?;

        if let Some(parent) = save_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(save_path, &bytes).await?;
        Ok(())
    }

    fn default_save_path(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let suffix = Uuid::new_v4().simple().to_string();
        self.ingest_dir
            .join(format!("image_{}_{}.png", timestamp, &suffix[..8]))
    }
}

pub fn validate_topic(topic: &str) -> AppResult<()> {
    if topic.trim().chars().count() < MIN_TOPIC_LEN {
        return Err(AppError::Validation(format!(
            "Topic must be at least {} characters long",
            MIN_TOPIC_LEN
        )));
    }
    Ok(())
}

fn prompt_count_error() -> AppError {
    AppError::Validation(format!("Number of prompts must be between 1 and {}", MAX_PROMPTS))
}

pub fn validate_prompt_count(n: usize) -> AppResult<()> {
    if !(1..=MAX_PROMPTS).contains(&n) {
        return Err(prompt_count_error());
    }
    Ok(())
}

/// Range-checked conversion of a requested prompt count from an API body.
pub fn prompt_count(n: i64) -> AppResult<usize> {
    let n = usize::try_from(n).map_err(|_| prompt_count_error())?;
    validate_prompt_count(n)?;
    Ok(n)
}

pub fn validate_image_prompt(prompt: &str) -> AppResult<()> {
    if prompt.trim().chars().count() < MIN_IMAGE_PROMPT_LEN {
        return Err(AppError::Validation(format!(
            "Prompt must be at least {} characters long",
            MIN_IMAGE_PROMPT_LEN
        )));
    }
    Ok(())
}

fn prompt_instruction(topic: &str, n: usize) -> String {
    format!(
        "You are a creative prompt generator for DALL-E. Given the topic '{}', \
         generate {} unique, detailed, and imaginative prompts for image generation. \
         Each prompt should be descriptive and specific. \
         Return only the list of prompts, one per line, no numbering or extra text.",
        topic, n
    )
}

/// One prompt per non-blank line, trimmed, at most `n`.
pub fn split_prompts(content: &str, n: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(n)
        .map(String::from)
        .collect()
}

#[async_trait]
impl Generator for AzureClient {
    async fn generate_prompts(&self, topic: &str, n: usize) -> AppResult<Vec<String>> {
        validate_topic(topic)?;
        validate_prompt_count(n)?;

        let instruction = prompt_instruction(topic, n);
        let request = ChatRequest {
            messages: vec![ChatMessage { role: "system", content: &instruction }],
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        };
        let url = self.deployment_url(&self.chat_deployment, "chat/completions");
        tracing::info!(topic, n, "Requesting prompts");

        let response: ChatResponse = self
            .retry
            .run("chat_completion", || self.post_json(&url, &request))
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("No completion content in response".to_string()))?;

        let prompts = split_prompts(&content, n);
        if prompts.len() < n {
            tracing::warn!("Generated only {} prompts instead of {}", prompts.len(), n);
        }
        Ok(prompts)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        save_path: Option<&Path>,
        options: &ImageOptions,
    ) -> AppResult<PathBuf> {
        validate_image_prompt(prompt)?;

        let request = ImageGenerationRequest {
            prompt,
            n: 1,
            size: &options.size,
            quality: &options.quality,
            style: &options.style,
        };
        let url = self.deployment_url(&self.image_deployment, "images/generations");
        tracing::info!(prompt, size = %options.size, "Generating image");

        let response: ImageGenerationResponse = self
            .retry
            .run("image_generation", || self.post_json(&url, &request))
            .await?;

        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream("No image data received from API".to_string()))?;
        if let Some(revised) = &image.revised_prompt {
            tracing::debug!(revised_prompt = %revised, "Model revised the prompt");
        }
        let image_url = image
            .url
            .ok_or_else(|| AppError::Upstream("No image URL in response".to_string()))?;

        let save_path = save_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_save_path());
        self.download(&image_url, &save_path).await?;
        validate_image(&save_path)?;

        tracing::info!(path = %save_path.display(), "Image generated and saved");
        Ok(save_path)
    }
}
