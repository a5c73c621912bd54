//! Axum request handlers for the HTTP API.
//!
//! Handlers delegate to the services and translate failures uniformly:
//! unknown prompt IDs become 404, everything else 500 with the error text.
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::models::{
    ApprovalRequest, ApprovalResponse, ImageRequest, ImageResponse, PromptResponse, TopicRequest,
};
use crate::api::routes::AppState;
use crate::azure::client::prompt_count;
use crate::error::AppError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = match err {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError { status, detail: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "title": "Image Generation API",
        "description": "API for generating and managing AI-generated images",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn generate_prompts(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TopicRequest>,
) -> Result<Json<PromptResponse>, ApiError> {
    let count = prompt_count(payload.num_prompts).map_err(|e| {
        tracing::error!("Rejected prompt count {}: {}", payload.num_prompts, e);
        ApiError::from(e)
    })?;
    state
        .prompt_service
        .generate_prompts(&payload.topic, count)
        .await
        .map(|prompts| Json(PromptResponse { prompts }))
        .map_err(|e| {
            tracing::error!("Failed to generate prompts: {}", e);
            e.into()
        })
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    state
        .image_service
        .generate_image(&payload.prompt_id, &payload.prompt)
        .await
        .map(|path| {
            Json(ImageResponse {
                image_path: path.display().to_string(),
                prompt_id: payload.prompt_id.clone(),
            })
        })
        .map_err(|e| {
            tracing::error!(prompt_id = %payload.prompt_id, "Failed to generate image: {}", e);
            e.into()
        })
}

pub async fn approve_image(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ApprovalRequest>,
) -> Result<Json<ApprovalResponse>, ApiError> {
    let found = state
        .image_service
        .approve_image(&payload.prompt_id, payload.approved)
        .await
        .map_err(|e| {
            tracing::error!(prompt_id = %payload.prompt_id, "Failed to record approval: {}", e);
            ApiError::from(e)
        })?;

    if !found {
        return Err(AppError::NotFound("Prompt ID not found".to_string()).into());
    }

    let decision = if payload.approved { "approved" } else { "rejected" };
    Ok(Json(ApprovalResponse {
        status: "success",
        message: format!("Image {} {}", payload.prompt_id, decision),
    }))
}
