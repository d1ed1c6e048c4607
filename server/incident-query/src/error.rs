//! Structured error types for the query service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Invalid or missing deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config: {key} is not set")]
  Missing { key: &'static str },

  #[error("config: {key}: {reason}")]
  Invalid { key: &'static str, reason: String },
}

impl ConfigError {
  pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
    Self::Invalid {
      key,
      reason: reason.into(),
    }
  }
}

/// Failure to obtain or decode database credentials.
#[derive(Debug, Error)]
pub enum SecretError {
  #[error("could not fetch database credentials: {0}")]
  Fetch(String),

  #[error("secret has no string value")]
  MissingSecretString,

  #[error("could not parse secret: {0}")]
  Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("database: {0}")]
  Database(#[from] sqlx_core::Error),
}

/// Anything that stops the service from starting. Only `main` turns this
/// into a process exit.
#[derive(Debug, Error)]
pub enum StartupError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Secret(#[from] SecretError),

  #[error("failed to connect database: {0}")]
  Connect(#[source] StoreError),

  #[error("schema preparation failed: {0}")]
  Migrate(#[source] StoreError),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl IntoResponse for StoreError {
  fn into_response(self) -> Response {
    tracing::error!(error = %self, "incident query failed");
    let body = serde_json::json!({ "error": "incident store unavailable" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
  }
}
