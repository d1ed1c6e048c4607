//! End-to-end tests for the HTTP surface, backed by the in-memory store.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

use incident_query::config::HttpConfig;
use incident_query::{
  AppState, Filters, Incident, IncidentStore, MemoryIncidentStore, Pagination, RecordMeta,
  StoreError,
};

fn incident(id: i64, number: &str, state: &str) -> Incident {
  let opened = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::minutes(id);
  Incident {
    model: RecordMeta {
      id,
      created_at: opened,
      updated_at: opened,
      deleted_at: None,
    },
    number: number.to_string(),
    incident_state: state.to_string(),
    active: state != "closed",
    caller_id: "caller-7".to_string(),
    opened_by: "alice".to_string(),
    opened_at: opened,
    contact_type: "phone".to_string(),
    location: "hq".to_string(),
    category: "network".to_string(),
    urgency: "2 - Medium".to_string(),
    assignment_group: "netops".to_string(),
    closed_code: String::new(),
    closed_at: None,
  }
}

fn http_config() -> HttpConfig {
  HttpConfig {
    host: "127.0.0.1".to_string(),
    port: 0,
    cors_allow_origins: Vec::new(),
  }
}

fn router_with(store: impl IncidentStore + 'static, max_page_size: u32) -> Router {
  router_with_config(store, max_page_size, &http_config())
}

fn router_with_config(
  store: impl IncidentStore + 'static,
  max_page_size: u32,
  http: &HttpConfig,
) -> Router {
  let state = Arc::new(AppState::new(
    Arc::new(store),
    NonZeroU32::new(max_page_size).unwrap(),
  ));
  incident_query::app(state, http)
}

fn scenario_router() -> Router {
  router_with(
    MemoryIncidentStore::new(vec![incident(1, "INC001", "open"), incident(2, "INC002", "closed")]),
    50,
  )
}

/// 25 rows, INC100..INC124, alternating state and urgency.
fn bulk_router(max_page_size: u32) -> Router {
  let rows = (0..25)
    .map(|n| {
      let mut i = incident(n + 1, &format!("INC{}", 100 + n), if n % 2 == 0 { "open" } else { "closed" });
      i.urgency = if n % 3 == 0 { "1 - High".into() } else { "3 - Low".into() };
      i
    })
    .collect();
  router_with(MemoryIncidentStore::new(rows), max_page_size)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
  let response = router
    .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
  (status, bytes.to_vec())
}

async fn get_numbers(router: Router, uri: &str) -> Vec<String> {
  let (status, body) = get(router, uri).await;
  assert_eq!(status, StatusCode::OK, "GET {}", uri);
  let incidents: Vec<Incident> = serde_json::from_slice(&body).unwrap();
  incidents.into_iter().map(|i| i.number).collect()
}

#[tokio::test]
async fn scenario_state_filter_and_lookup() {
  assert_eq!(
    get_numbers(scenario_router(), "/incidents?incident_state=open").await,
    vec!["INC001"]
  );
  assert_eq!(get_numbers(scenario_router(), "/incidents/INC002").await, vec!["INC002"]);
  assert!(get_numbers(scenario_router(), "/incidents?incident_state=pending")
    .await
    .is_empty());
}

#[tokio::test]
async fn unfiltered_listing_returns_everything_in_id_order() {
  assert_eq!(
    get_numbers(scenario_router(), "/incidents").await,
    vec!["INC001", "INC002"]
  );
}

#[tokio::test]
async fn unknown_filter_has_no_effect() {
  assert_eq!(
    get_numbers(scenario_router(), "/incidents?caller_id=nobody&color=red").await,
    vec!["INC001", "INC002"]
  );
}

#[tokio::test]
async fn two_filters_are_anded() {
  let uri = "/incidents?incident_state=open&urgency=1%20-%20High";
  let numbers = get_numbers(bulk_router(100), uri).await;
  // open: even n; high: n % 3 == 0 → n in {0, 6, 12, 18, 24}
  assert_eq!(numbers, vec!["INC100", "INC106", "INC112", "INC118", "INC124"]);
}

#[tokio::test]
async fn repeated_filter_uses_first_value() {
  assert_eq!(
    get_numbers(scenario_router(), "/incidents?incident_state=closed&incident_state=open").await,
    vec!["INC002"]
  );
}

#[tokio::test]
async fn every_whitelisted_field_filters() {
  let mut special = incident(3, "INC003", "open");
  special.opened_by = "bob".into();
  special.category = "database".into();
  special.urgency = "1 - High".into();
  special.assignment_group = "dba".into();
  let rows = vec![incident(1, "INC001", "open"), incident(2, "INC002", "closed"), special];

  for query in [
    "opened_by=bob",
    "category=database",
    "urgency=1%20-%20High",
    "assignment_group=dba",
  ] {
    let router = router_with(MemoryIncidentStore::new(rows.clone()), 50);
    let uri = format!("/incidents?{}", query);
    assert_eq!(get_numbers(router, &uri).await, vec!["INC003"], "{}", uri);
  }
}

#[tokio::test]
async fn default_window_is_capped_by_max_page_size() {
  let numbers = get_numbers(bulk_router(10), "/incidents").await;
  assert_eq!(numbers.len(), 10);
  assert_eq!(numbers.first().map(String::as_str), Some("INC100"));
}

#[tokio::test]
async fn page_and_limit_select_window() {
  let numbers = get_numbers(bulk_router(50), "/incidents?page=3&limit=10").await;
  assert_eq!(numbers.len(), 5);
  assert_eq!(numbers[0], "INC120");
}

#[tokio::test]
async fn oversized_or_invalid_limit_falls_back_to_ceiling() {
  assert_eq!(get_numbers(bulk_router(7), "/incidents?limit=500").await.len(), 7);
  assert_eq!(get_numbers(bulk_router(7), "/incidents?limit=-1").await.len(), 7);
  assert_eq!(get_numbers(bulk_router(7), "/incidents?limit=lots").await.len(), 7);
}

#[tokio::test]
async fn negative_page_is_first_page() {
  let numbers = get_numbers(bulk_router(50), "/incidents?page=-3&limit=2").await;
  assert_eq!(numbers, vec!["INC100", "INC101"]);
}

#[tokio::test]
async fn out_of_range_page_number_is_past_the_end() {
  assert!(get_numbers(bulk_router(50), "/incidents?page=99999999999999999999&limit=10")
    .await
    .is_empty());
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
  assert!(get_numbers(bulk_router(50), "/incidents?page=99&limit=10")
    .await
    .is_empty());
}

#[tokio::test]
async fn missing_number_is_empty_array_not_404() {
  let (status, body) = get(scenario_router(), "/incidents/INC999").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, b"[]");
}

#[tokio::test]
async fn duplicate_numbers_are_all_returned_and_paginated() {
  let rows = vec![
    incident(1, "INC500", "open"),
    incident(2, "INC501", "open"),
    incident(3, "INC500", "closed"),
    incident(4, "INC500", "resolved"),
  ];
  let router = router_with(MemoryIncidentStore::new(rows.clone()), 50);
  assert_eq!(get_numbers(router, "/incidents/INC500").await.len(), 3);

  let router = router_with(MemoryIncidentStore::new(rows), 50);
  let (_, body) = get(router, "/incidents/INC500?page=2&limit=2").await;
  let incidents: Vec<Incident> = serde_json::from_slice(&body).unwrap();
  assert_eq!(incidents.len(), 1);
  assert_eq!(incidents[0].incident_state, "resolved");
}

#[tokio::test]
async fn number_lookup_ignores_filter_params() {
  assert_eq!(
    get_numbers(scenario_router(), "/incidents/INC002?incident_state=open").await,
    vec!["INC002"]
  );
}

#[tokio::test]
async fn soft_deleted_rows_are_hidden() {
  let mut gone = incident(2, "INC002", "open");
  gone.model.deleted_at = Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
  let rows = vec![incident(1, "INC001", "open"), gone];

  let router = router_with(MemoryIncidentStore::new(rows.clone()), 50);
  assert_eq!(get_numbers(router, "/incidents").await, vec!["INC001"]);

  let router = router_with(MemoryIncidentStore::new(rows), 50);
  assert!(get_numbers(router, "/incidents/INC002").await.is_empty());
}

#[tokio::test]
async fn incident_json_shape() {
  let (_, body) = get(scenario_router(), "/incidents/INC001").await;
  let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
  let first = &value[0];
  assert_eq!(first["number"], "INC001");
  assert_eq!(first["incident_state"], "open");
  assert_eq!(first["active"], true);
  assert_eq!(first["model"]["ID"], 1);
  assert!(first["model"]["DeletedAt"].is_null());
  assert!(first["closed_at"].is_null());
  assert!(first["opened_at"].is_string());
}

#[tokio::test]
async fn health_is_plain_ok() {
  let (status, body) = get(scenario_router(), "/health").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, b"OK");
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

const ALLOWED_ORIGIN: &str = "http://brandonregard.info";

fn restricted_cors_router() -> Router {
  let http = HttpConfig {
    cors_allow_origins: vec![ALLOWED_ORIGIN.to_string()],
    ..http_config()
  };
  router_with_config(
    MemoryIncidentStore::new(vec![incident(1, "INC001", "open")]),
    50,
    &http,
  )
}

async fn send(router: Router, request: Request<Body>) -> axum::response::Response {
  router.oneshot(request).await.unwrap()
}

fn allow_origin(response: &axum::response::Response) -> Option<&str> {
  response
    .headers()
    .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn configured_origin_is_allowed() {
  let request = Request::builder()
    .uri("/incidents")
    .header(header::ORIGIN, ALLOWED_ORIGIN)
    .body(Body::empty())
    .unwrap();
  let response = send(restricted_cors_router(), request).await;
  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(allow_origin(&response), Some(ALLOWED_ORIGIN));
}

#[tokio::test]
async fn other_origin_gets_no_allow_header() {
  let request = Request::builder()
    .uri("/incidents")
    .header(header::ORIGIN, "http://evil.example.com")
    .body(Body::empty())
    .unwrap();
  let response = send(restricted_cors_router(), request).await;
  assert_eq!(allow_origin(&response), None);
}

#[tokio::test]
async fn preflight_allows_get_and_listed_headers_only() {
  let request = Request::builder()
    .method(Method::OPTIONS)
    .uri("/incidents")
    .header(header::ORIGIN, ALLOWED_ORIGIN)
    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
    .body(Body::empty())
    .unwrap();
  let response = send(restricted_cors_router(), request).await;
  assert_eq!(allow_origin(&response), Some(ALLOWED_ORIGIN));

  let methods = response
    .headers()
    .get(header::ACCESS_CONTROL_ALLOW_METHODS)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default();
  assert_eq!(methods, "GET");

  let headers = response
    .headers()
    .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_ascii_lowercase();
  for name in ["origin", "content-type", "accept"] {
    assert!(headers.contains(name), "{} missing from {}", name, headers);
  }
  assert!(!headers.contains("authorization"));
}

#[tokio::test]
async fn unset_origins_allow_any_origin() {
  let request = Request::builder()
    .uri("/health")
    .header(header::ORIGIN, "http://anywhere.example.com")
    .body(Body::empty())
    .unwrap();
  let response = send(scenario_router(), request).await;
  assert_eq!(allow_origin(&response), Some("*"));
}

// ---------------------------------------------------------------------------
// Store failures
// ---------------------------------------------------------------------------

struct BrokenStore;

#[async_trait]
impl IncidentStore for BrokenStore {
  async fn list(&self, _: &Filters, _: Pagination) -> Result<Vec<Incident>, StoreError> {
    Err(StoreError::Database(sqlx_core::Error::PoolTimedOut))
  }

  async fn by_number(&self, _: &str, _: Pagination) -> Result<Vec<Incident>, StoreError> {
    Err(StoreError::Database(sqlx_core::Error::PoolClosed))
  }
}

#[tokio::test]
async fn health_does_not_depend_on_store() {
  let (status, body) = get(router_with(BrokenStore, 50), "/health").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, b"OK");
}

#[tokio::test]
async fn store_failure_is_500_with_generic_body() {
  for uri in ["/incidents", "/incidents/INC001"] {
    let (status, body) = get(router_with(BrokenStore, 50), uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["error"], "incident store unavailable");
  }
}
