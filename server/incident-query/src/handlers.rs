//! HTTP handlers for the query service.

use axum::extract::{Path, Query, State};
use axum::Json;
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreError;
use crate::filter::Filters;
use crate::pagination::Pagination;
use crate::state::AppState;
use crate::types::Incident;

/// Raw query string as ordered pairs, repeats preserved.
type QueryPairs = Vec<(String, String)>;

fn as_str_pairs(pairs: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
  pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

pub async fn health() -> &'static str {
  "OK"
}

pub async fn list_incidents(
  State(state): State<Arc<AppState>>,
  Query(params): Query<QueryPairs>,
) -> Result<Json<Vec<Incident>>, StoreError> {
  let filters = Filters::from_pairs(as_str_pairs(&params));
  let page = Pagination::from_pairs(as_str_pairs(&params), state.max_page_size);
  debug!(
    filters = filters.len(),
    offset = page.offset,
    limit = page.limit,
    "list incidents"
  );

  let incidents = state.store.list(&filters, page).await?;
  Ok(Json(incidents))
}

pub async fn get_incident(
  State(state): State<Arc<AppState>>,
  Path(number): Path<String>,
  Query(params): Query<QueryPairs>,
) -> Result<Json<Vec<Incident>>, StoreError> {
  let page = Pagination::from_pairs(as_str_pairs(&params), state.max_page_size);
  debug!(number = %number, offset = page.offset, limit = page.limit, "get incident");

  let incidents = state.store.by_number(&number, page).await?;
  Ok(Json(incidents))
}
