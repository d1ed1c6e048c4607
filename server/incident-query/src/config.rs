//! Deployment configuration, validated once at startup.

use std::num::NonZeroU32;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
  /// Page-size ceiling; also the default `limit`.
  pub max_page_size: NonZeroU32,
  /// Secrets Manager id holding `{"DB_USER", "DB_PASSWORD"}`.
  pub secret_id: String,
  pub database: DatabaseConfig,
  pub http: HttpConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
  pub host: String,
  pub port: u16,
  pub name: String,
  pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
  pub host: String,
  pub port: u16,
  /// Empty means any origin is allowed.
  pub cors_allow_origins: Vec<String>,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from an arbitrary key lookup. Empty values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let require = |key: &'static str| get(key).ok_or(ConfigError::Missing { key });

    let max_page_size = require("MAX_PAGE_SIZE")?
      .trim()
      .parse::<NonZeroU32>()
      .map_err(|_| ConfigError::invalid("MAX_PAGE_SIZE", "must be a positive integer"))?;

    let database = DatabaseConfig {
      host: require("DB_HOST")?,
      port: parse_port("DB_PORT", &require("DB_PORT")?)?,
      name: require("DB_NAME")?,
      max_connections: match get("DB_MAX_CONNECTIONS") {
        Some(v) => v
          .trim()
          .parse::<NonZeroU32>()
          .map_err(|_| ConfigError::invalid("DB_MAX_CONNECTIONS", "must be a positive integer"))?
          .get(),
        None => DEFAULT_MAX_CONNECTIONS,
      },
    };

    let http = HttpConfig {
      host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
      port: match get("PORT") {
        Some(v) => parse_port("PORT", &v)?,
        None => DEFAULT_PORT,
      },
      cors_allow_origins: get("CORS_ALLOW_ORIGINS")
        .map(|v| {
          v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
        })
        .unwrap_or_default(),
    };

    Ok(Self {
      max_page_size,
      secret_id: require("SECRET")?,
      database,
      http,
    })
  }
}

fn parse_port(key: &'static str, raw: &str) -> Result<u16, ConfigError> {
  raw
    .trim()
    .parse::<u16>()
    .map_err(|_| ConfigError::invalid(key, format!("invalid port number {:?}", raw)))
}
