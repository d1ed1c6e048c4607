//! Binary entrypoint for the incident query service.

use std::sync::Arc;

use tracing::{error, info};

use incident_query::secret::{self, SecretsManagerSource};
use incident_query::shutdown;
use incident_query::{AppState, Config, PgIncidentStore, StartupError};

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  if let Err(e) = run().await {
    error!(error = %e, "incident-query failed to start");
    std::process::exit(1);
  }
}

async fn run() -> Result<(), StartupError> {
  if let Ok(path) = dotenvy::dotenv() {
    info!(path = %path.display(), "loaded .env");
  }

  let config = Config::from_env()?;
  info!(max_page_size = config.max_page_size.get(), "configuration loaded");

  let source = SecretsManagerSource::from_env().await;
  let creds = secret::load_credentials(&source, &config.secret_id).await?;

  let store = PgIncidentStore::connect(&config.database, &creds)
    .await
    .map_err(StartupError::Connect)?;
  store.migrate().await.map_err(StartupError::Migrate)?;

  let state = Arc::new(AppState::new(Arc::new(store), config.max_page_size));
  let app = incident_query::app(state, &config.http);

  let addr = format!("{}:{}", config.http.host, config.http.port);
  let listener = tokio::net::TcpListener::bind(&addr).await?;
  info!(addr = %addr, "incident-query listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown::shutdown_signal())
    .await?;

  info!("incident-query stopped");
  Ok(())
}
