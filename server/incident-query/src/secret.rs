//! Database credentials from AWS Secrets Manager.

use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use serde::Deserialize;
use tracing::info;

use crate::error::SecretError;

#[derive(Clone, Deserialize)]
pub struct DbCredentials {
  #[serde(rename = "DB_USER")]
  pub user: String,
  #[serde(rename = "DB_PASSWORD")]
  pub password: String,
}

impl fmt::Debug for DbCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DbCredentials")
      .field("user", &self.user)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// Decode the secret payload. Extra keys in the secret are ignored.
pub fn parse_credentials(raw: &str) -> Result<DbCredentials, SecretError> {
  Ok(serde_json::from_str(raw)?)
}

/// Where the raw secret string comes from.
#[async_trait]
pub trait SecretSource: Send + Sync {
  async fn fetch(&self, secret_id: &str) -> Result<String, SecretError>;
}

pub struct SecretsManagerSource {
  client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerSource {
  /// Region and credentials come from the default AWS provider chain.
  pub async fn from_env() -> Self {
    let aws_cfg = aws_config::defaults(BehaviorVersion::latest()).load().await;
    Self {
      client: aws_sdk_secretsmanager::Client::new(&aws_cfg),
    }
  }
}

#[async_trait]
impl SecretSource for SecretsManagerSource {
  async fn fetch(&self, secret_id: &str) -> Result<String, SecretError> {
    let output = self
      .client
      .get_secret_value()
      .secret_id(secret_id)
      .send()
      .await
      .map_err(|e| SecretError::Fetch(DisplayErrorContext(&e).to_string()))?;

    output
      .secret_string()
      .map(str::to_string)
      .ok_or(SecretError::MissingSecretString)
  }
}

pub async fn load_credentials(
  source: &dyn SecretSource,
  secret_id: &str,
) -> Result<DbCredentials, SecretError> {
  let raw = source.fetch(secret_id).await?;
  let creds = parse_credentials(&raw)?;
  info!(secret_id = %secret_id, user = %creds.user, "database credentials loaded");
  Ok(creds)
}
