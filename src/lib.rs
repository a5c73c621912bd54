//! Prompt and image approval API library
//!
//! Modules:
//! - `api`: Axum HTTP handlers and router setup used by the binary.
//! - `azure`: Azure OpenAI client, the `Generator` seam and retry policy.
//! - `services`: Prompt generation and the image approve/reject lifecycle.
//! - `store`: Prompt records and the JSON file store.
//! - `utils`: Directory layout, logging, image checks, file helpers.
//! - `config`: Env-driven configuration loader.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `AzureClient`,
//! `JsonFileStore`, `PromptService` and `ImageService`.
pub mod api;
pub mod azure;
pub mod services;
pub mod store;
pub mod utils;
pub mod config;
pub mod error;

pub use config::Config;
pub use azure::client::AzureClient;
pub use store::json_file::JsonFileStore;
pub use services::{ImageService, PromptService};
pub use utils::paths::PathManager;

use std::sync::Arc;

/// Wire the services used by both the server and the CLI.
pub fn build_services(
    config: &Config,
    paths: &PathManager,
    generator: Arc<dyn azure::Generator>,
) -> (Arc<PromptService>, Arc<ImageService>) {
    let store = Arc::new(JsonFileStore::new(paths.prompts_file()));
    let prompt_service = Arc::new(PromptService::new(store, generator.clone()));
    let image_service = Arc::new(ImageService::new(
        prompt_service.clone(),
        generator,
        paths.clone(),
        config.image.clone(),
    ));
    (prompt_service, image_service)
}
