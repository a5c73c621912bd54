//! Request and response bodies for the HTTP API.
use serde::{Deserialize, Serialize};

use crate::store::PromptMap;

fn default_num_prompts() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
    #[serde(default = "default_num_prompts")]
    pub num_prompts: i64,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompts: PromptMap,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt_id: String,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub image_path: String,
    pub prompt_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub prompt_id: String,
    pub approved: bool,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub status: &'static str,
    pub message: String,
}
