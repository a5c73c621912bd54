//! Common error type and result alias.
//!
//! Every layer returns `AppResult<T>`; the HTTP layer decides how each kind
//! maps to a status code.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-correctable input problem (topic, prompt, count, image checks).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The AI service answered, but not with something usable.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type AppResult<T> = Result<T, AppError>;
