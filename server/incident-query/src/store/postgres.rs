use std::time::Duration;

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_builder::QueryBuilder;
use sqlx_postgres::{PgConnectOptions, PgPool, PgPoolOptions, Postgres};
use tracing::{debug, info};

use super::IncidentStore;
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::filter::Filters;
use crate::pagination::Pagination;
use crate::secret::DbCredentials;
use crate::types::Incident;

const SELECT_INCIDENTS: &str = r#"
  SELECT id, created_at, updated_at, deleted_at,
         number, incident_state, active, caller_id, opened_by, opened_at,
         contact_type, location, category, urgency, assignment_group,
         closed_code, closed_at
  FROM incidents
  WHERE deleted_at IS NULL"#;

const SCHEMA: &[&str] = &[
  r#"
  CREATE TABLE IF NOT EXISTS incidents (
    id               BIGSERIAL PRIMARY KEY,
    created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at       TIMESTAMPTZ,
    number           TEXT NOT NULL DEFAULT '',
    incident_state   TEXT NOT NULL DEFAULT '',
    active           BOOLEAN NOT NULL DEFAULT FALSE,
    caller_id        TEXT NOT NULL DEFAULT '',
    opened_by        TEXT NOT NULL DEFAULT '',
    opened_at        TIMESTAMPTZ NOT NULL DEFAULT now(),
    contact_type     TEXT NOT NULL DEFAULT '',
    location         TEXT NOT NULL DEFAULT '',
    category         TEXT NOT NULL DEFAULT '',
    urgency          TEXT NOT NULL DEFAULT '',
    assignment_group TEXT NOT NULL DEFAULT '',
    closed_code      TEXT NOT NULL DEFAULT '',
    closed_at        TIMESTAMPTZ
  )
  "#,
  "CREATE INDEX IF NOT EXISTS idx_incidents_number ON incidents (number)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_incident_state ON incidents (incident_state)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_active ON incidents (active)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_opened_by ON incidents (opened_by)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_opened_at ON incidents (opened_at)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_category ON incidents (category)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_urgency ON incidents (urgency)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_assignment_group ON incidents (assignment_group)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_closed_at ON incidents (closed_at)",
  "CREATE INDEX IF NOT EXISTS idx_incidents_deleted_at ON incidents (deleted_at)",
];

pub struct PgIncidentStore {
  pool: PgPool,
}

impl PgIncidentStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(config: &DatabaseConfig, creds: &DbCredentials) -> Result<Self, StoreError> {
    let options = PgConnectOptions::new()
      .host(&config.host)
      .port(config.port)
      .database(&config.name)
      .username(&creds.user)
      .password(&creds.password);

    let pool = PgPoolOptions::new()
      .max_connections(config.max_connections)
      .acquire_timeout(Duration::from_secs(5))
      .connect_with(options)
      .await?;

    info!(host = %config.host, port = config.port, database = %config.name, "database connected");
    Ok(Self::new(pool))
  }

  /// Create the table and its indexes if they do not exist yet.
  pub async fn migrate(&self) -> Result<(), StoreError> {
    for stmt in SCHEMA {
      query::<Postgres>(*stmt).execute(&self.pool).await?;
    }
    info!("incidents schema ready");
    Ok(())
  }
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, page: Pagination) {
  qb.push(" ORDER BY id LIMIT ")
    .push_bind(page.limit)
    .push(" OFFSET ")
    .push_bind(page.offset);
}

/// Live rows matching every filter, ordered by id, within the page window.
fn list_query(filters: &Filters, page: Pagination) -> QueryBuilder<'static, Postgres> {
  let mut qb = QueryBuilder::new(SELECT_INCIDENTS);
  for (field, value) in filters.iter() {
    // Column names come only from the whitelist enum; values are always bound.
    qb.push(" AND ")
      .push(field.column())
      .push(" = ")
      .push_bind(value.to_string());
  }
  push_window(&mut qb, page);
  qb
}

fn by_number_query(number: &str, page: Pagination) -> QueryBuilder<'static, Postgres> {
  let mut qb = QueryBuilder::new(SELECT_INCIDENTS);
  qb.push(" AND number = ").push_bind(number.to_string());
  push_window(&mut qb, page);
  qb
}

#[async_trait]
impl IncidentStore for PgIncidentStore {
  async fn list(&self, filters: &Filters, page: Pagination) -> Result<Vec<Incident>, StoreError> {
    let mut qb = list_query(filters, page);
    debug!(sql = %qb.sql(), "list incidents");
    let rows = qb.build_query_as::<Incident>().fetch_all(&self.pool).await?;
    Ok(rows)
  }

  async fn by_number(&self, number: &str, page: Pagination) -> Result<Vec<Incident>, StoreError> {
    let mut qb = by_number_query(number, page);
    let rows = qb.build_query_as::<Incident>().fetch_all(&self.pool).await?;
    Ok(rows)
  }
}
