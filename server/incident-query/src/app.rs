//! Router assembly.

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::HttpConfig;
use crate::handlers;
use crate::state::AppState;

pub fn app(state: Arc<AppState>, http: &HttpConfig) -> Router {
  Router::new()
    .route("/incidents", get(handlers::list_incidents))
    .route("/incidents/:number", get(handlers::get_incident))
    .route("/health", get(handlers::health))
    .layer(cors_layer(&http.cors_allow_origins))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Permissive when no origins are configured; otherwise GET-only for the
/// listed origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
  if origins.is_empty() {
    return CorsLayer::permissive();
  }

  let allowed: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| match HeaderValue::from_str(o) {
      Ok(v) => Some(v),
      Err(_) => {
        warn!(origin = %o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(allowed))
    .allow_methods([Method::GET])
    .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
}
