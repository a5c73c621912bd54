//! Shared state and router construction.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::services::{ImageService, PromptService};

pub const API_PREFIX: &str = "/api/v1";

pub struct AppState {
    pub prompt_service: Arc<PromptService>,
    pub image_service: Arc<ImageService>,
}

/// All routes, with the API endpoints nested under `API_PREFIX`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/generate-prompts", post(handlers::generate_prompts))
        .route("/generate-image", post(handlers::generate_image))
        .route("/approve-image", post(handlers::approve_image));

    Router::new()
        .route("/", get(handlers::root))
        .nest(API_PREFIX, api)
        .with_state(state)
}
