//! Image generation for stored prompts and the approve/reject decision.
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;

use crate::azure::Generator;
use crate::config::ImageOptions;
use crate::error::{AppError, AppResult};
use crate::services::prompt_service::PromptService;
use crate::store::PromptStatus;
use crate::utils::fs_ops::move_file;
use crate::utils::paths::PathManager;

pub struct ImageService {
    prompts: Arc<PromptService>,
    generator: Arc<dyn Generator>,
    paths: PathManager,
    options: ImageOptions,
}

/// Prompt IDs end up in file names, so only plain alphanumerics are allowed.
fn validate_prompt_id(prompt_id: &str) -> AppResult<()> {
    if prompt_id.is_empty() || !prompt_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(format!("Invalid prompt id '{}'", prompt_id)));
    }
    Ok(())
}

impl ImageService {
    pub fn new(
        prompts: Arc<PromptService>,
        generator: Arc<dyn Generator>,
        paths: PathManager,
        options: ImageOptions,
    ) -> Self {
        ImageService { prompts, generator, paths, options }
    }

    /// Generate the image for `prompt_id` into the ingest folder and mark the
    /// record `generated`. Generator errors are returned as-is.
    pub async fn generate_image(&self, prompt_id: &str, prompt: &str) -> AppResult<PathBuf> {
        validate_prompt_id(prompt_id)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let target = self
            .paths
            .ingest_dir()
            .join(format!("image_{}_{}.png", prompt_id, timestamp));

        let image_path = self
            .generator
            .generate_image(prompt, Some(&target), &self.options)
            .await?;

        self.prompts
            .update_status(prompt_id, PromptStatus::Generated, Some(&image_path))
            .await?;
        Ok(image_path)
    }

    /// Record the decision for `prompt_id`. Approved images move to the
    /// approved folder under the same file name. Returns `false` for an
    /// unknown ID without touching the store.
    ///
    /// If saving fails after the move, the file is moved back before the
    /// error is returned.
    pub async fn approve_image(&self, prompt_id: &str, approved: bool) -> AppResult<bool> {
        let _guard = self.prompts.lock().await;
        let mut prompts = self.prompts.load().await?;

        let Some(record) = prompts.get_mut(prompt_id) else {
            return Ok(false);
        };
        record.approved = approved;
        record.status = if approved { PromptStatus::Approved } else { PromptStatus::Rejected };

        let mut moved = None;
        if approved {
            if let Some(current) = record.image_path.as_deref().map(PathBuf::from) {
                let file_name = current.file_name().ok_or_else(|| {
                    AppError::Validation(format!("Stored image path has no file name: {}", current.display()))
                })?;
                let new_path = self.paths.approved_dir().join(file_name);

                move_file(&current, &new_path).await?;
                tracing::info!(prompt_id, from = %current.display(), to = %new_path.display(), "Moved approved image");
                record.image_path = Some(new_path.display().to_string());
                moved = Some((current, new_path));
            }
        }

        if let Err(e) = self.prompts.save(&prompts).await {
            if let Some((original, new_path)) = moved {
                if let Err(undo) = move_file(&new_path, &original).await {
                    tracing::error!(
                        prompt_id,
                        path = %new_path.display(),
                        error = %undo,
                        "Could not move image back after failed save"
                    );
                }
            }
            return Err(e);
        }

        tracing::info!(prompt_id, approved, "Recorded approval decision");
        Ok(true)
    }
}
