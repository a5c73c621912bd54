//! Prompt record schema, as persisted in `prompts.json`.
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStatus {
    Pending,
    Generated,
    Approved,
    Rejected,
}

impl PromptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStatus::Pending => "pending",
            PromptStatus::Generated => "generated",
            PromptStatus::Approved => "approved",
            PromptStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PromptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub prompt: String,
    pub approved: bool,
    pub image_path: Option<String>,
    pub status: PromptStatus,
    pub created_at: NaiveDateTime,
    pub topic: String,
}

impl PromptRecord {
    pub fn pending(prompt: String, topic: &str, created_at: NaiveDateTime) -> Self {
        PromptRecord {
            prompt,
            approved: false,
            image_path: None,
            status: PromptStatus::Pending,
            created_at,
            topic: topic.to_string(),
        }
    }
}

/// The whole store document: string ID to record.
pub type PromptMap = BTreeMap<String, PromptRecord>;

/// `max(integer keys, 0) + 1`. Keys that are not integers are ignored.
pub fn next_id(prompts: &PromptMap) -> u64 {
    prompts
        .keys()
        .filter_map(|k| k.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}
