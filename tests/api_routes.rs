use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use prompt_image_api::api::{build_router, AppState};
use prompt_image_api::azure::Generator;
use prompt_image_api::config::{Config, ImageOptions};
use prompt_image_api::error::{AppError, AppResult};
use prompt_image_api::{build_services, PathManager};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Numbered prompts; writes a small PNG for images. Short prompts fail the
/// same way the real client does.
struct StubGenerator;

#[async_trait]
impl Generator for StubGenerator {
    async fn generate_prompts(&self, topic: &str, n: usize) -> AppResult<Vec<String>> {
        Ok((1..=n).map(|i| format!("{} idea {}", topic, i)).collect())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        save_path: Option<&Path>,
        _options: &ImageOptions,
    ) -> AppResult<PathBuf> {
        if prompt.trim().len() < 10 {
            return Err(AppError::Validation("Prompt must be at least 10 characters long".into()));
        }
        let path = save_path.expect("service always passes a path").to_path_buf();
        image::RgbImage::new(256, 256)
            .save(&path)
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        Ok(path)
    }
}

fn app() -> (Router, PathManager, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let paths = PathManager::new(tmp.path());
    paths.ensure_directories().unwrap();
    let config = Config::from_lookup(|_| None).unwrap();

    let (prompt_service, image_service) = build_services(&config, &paths, Arc::new(StubGenerator));
    let state = Arc::new(AppState { prompt_service, image_service });
    (build_router(state), paths, tmp)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn root_reports_service_info() {
    let (app, _paths, _tmp) = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_prompts_returns_whole_store() {
    let (app, paths, _tmp) = app();

    let (status, body) = post(&app, "/api/v1/generate-prompts", json!({"topic": "tides", "num_prompts": 2})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompts"]["1"]["prompt"], "tides idea 1");
    assert_eq!(body["prompts"]["2"]["status"], "pending");
    assert_eq!(body["prompts"]["2"]["approved"], false);
    assert_eq!(body["prompts"]["2"]["image_path"], Value::Null);

    // default count is 10, and the earlier records come back too
    let (status, body) = post(&app, "/api/v1/generate-prompts", json!({"topic": "dunes"})).await;
    assert_eq!(status, StatusCode::OK);
    let prompts = body["prompts"].as_object().unwrap();
    assert_eq!(prompts.len(), 12);
    assert_eq!(prompts["12"]["topic"], "dunes");

    assert!(paths.prompts_file().exists());
}

#[tokio::test]
async fn full_lifecycle_generate_then_approve() {
    let (app, paths, _tmp) = app();
    post(&app, "/api/v1/generate-prompts", json!({"topic": "harbours", "num_prompts": 1})).await;

    let (status, body) = post(
        &app,
        "/api/v1/generate-image",
        json!({"prompt_id": "1", "prompt": "fishing boats at a foggy harbour"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt_id"], "1");
    let ingest_path = PathBuf::from(body["image_path"].as_str().unwrap());
    assert!(ingest_path.starts_with(paths.ingest_dir()));
    assert!(ingest_path.exists());

    let (status, body) = post(&app, "/api/v1/approve-image", json!({"prompt_id": "1", "approved": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "message": "Image 1 approved"}));

    let approved_path = paths.approved_dir().join(ingest_path.file_name().unwrap());
    assert!(!ingest_path.exists());
    assert!(approved_path.exists());

    let stored: Value = serde_json::from_slice(&std::fs::read(paths.prompts_file()).unwrap()).unwrap();
    assert_eq!(stored["1"]["status"], "approved");
    assert_eq!(stored["1"]["image_path"], approved_path.display().to_string());
}

#[tokio::test]
async fn rejecting_reports_rejected() {
    let (app, _paths, _tmp) = app();
    post(&app, "/api/v1/generate-prompts", json!({"topic": "glaciers", "num_prompts": 1})).await;

    let (status, body) = post(&app, "/api/v1/approve-image", json!({"prompt_id": "1", "approved": false})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Image 1 rejected");
}

#[tokio::test]
async fn approving_unknown_prompt_is_404() {
    let (app, paths, _tmp) = app();

    let (status, body) = post(&app, "/api/v1/approve-image", json!({"prompt_id": "404", "approved": true})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("Prompt ID not found"));
    assert!(!paths.prompts_file().exists());
}

#[tokio::test]
async fn generator_errors_become_500_with_message() {
    let (app, _paths, _tmp) = app();

    let (status, body) = post(&app, "/api/v1/generate-image", json!({"prompt_id": "1", "prompt": "tiny"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("at least 10 characters"));
}

#[tokio::test]
async fn malformed_body_is_rejected_before_the_handler() {
    let (app, _paths, _tmp) = app();
    let (status, _) = post(&app, "/api/v1/approve-image", json!({"prompt_id": "1"})).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn negative_prompt_count_is_a_500_validation_error() {
    let (app, paths, _tmp) = app();

    for count in [-1, 0, 21] {
        let (status, body) =
            post(&app, "/api/v1/generate-prompts", json!({"topic": "oceans", "num_prompts": count})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "num_prompts = {count}");
        assert!(body["detail"].as_str().unwrap().contains("between 1 and 20"));
    }
    assert!(!paths.prompts_file().exists());
}
