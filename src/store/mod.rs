//! Prompt persistence.
//!
//! `PromptStore` is the seam services depend on; `JsonFileStore` keeps the
//! whole mapping in a single JSON document that is rewritten on every save.
use async_trait::async_trait;

use crate::error::AppResult;

pub mod json_file;
pub mod record;

pub use json_file::JsonFileStore;
pub use record::{next_id, PromptMap, PromptRecord, PromptStatus};

#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Read the full mapping. A missing document is an empty mapping.
    async fn load(&self) -> AppResult<PromptMap>;

    /// Replace the full mapping.
    async fn save(&self, prompts: &PromptMap) -> AppResult<()>;
}
