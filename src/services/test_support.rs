//! In-memory collaborators for service unit tests.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Local;

use crate::azure::Generator;
use crate::config::ImageOptions;
use crate::error::{AppError, AppResult};
use crate::store::{PromptMap, PromptRecord, PromptStore};

#[derive(Default)]
pub struct MemoryStore {
    prompts: Mutex<PromptMap>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn with_ids(ids: &[&str]) -> Self {
        let now = Local::now().naive_local();
        let prompts = ids
            .iter()
            .map(|id| {
                let rec = PromptRecord::pending(format!("seeded prompt number {}", id), "seed", now);
                (id.to_string(), rec)
            })
            .collect();
        MemoryStore {
            prompts: Mutex::new(prompts),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn load(&self) -> AppResult<PromptMap> {
        Ok(self.prompts.lock().unwrap().clone())
    }

    async fn save(&self, prompts: &PromptMap) -> AppResult<()> {
        *self.prompts.lock().unwrap() = prompts.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Returns canned prompts and writes a placeholder file as the "image".
#[derive(Default)]
pub struct FakeGenerator {
    prompts: Vec<String>,
    fail: bool,
    pub image_requests: Mutex<Vec<(String, Option<PathBuf>, ImageOptions)>>,
}

impl FakeGenerator {
    pub fn with_prompts(prompts: &[&str]) -> Self {
        FakeGenerator {
            prompts: prompts.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        FakeGenerator {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate_prompts(&self, _topic: &str, n: usize) -> AppResult<Vec<String>> {
        if self.fail {
            return Err(AppError::Upstream("model offline".into()));
        }
        Ok(self.prompts.iter().take(n).cloned().collect())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        save_path: Option<&Path>,
        options: &ImageOptions,
    ) -> AppResult<PathBuf> {
        self.image_requests.lock().unwrap().push((
            prompt.to_string(),
            save_path.map(Path::to_path_buf),
            options.clone(),
        ));
        if self.fail {
            return Err(AppError::Upstream("model offline".into()));
        }
        let path = save_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| std::env::temp_dir().join("fake_image.png"));
        tokio::fs::write(&path, b"fake image bytes").await?;
        Ok(path)
    }
}
