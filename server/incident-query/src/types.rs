//! Incident record as stored in the `incidents` table and served over HTTP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx_core::from_row::FromRow;
use sqlx_core::row::Row;
use sqlx_postgres::PgRow;

/// Row bookkeeping shared by every record: surrogate key, audit timestamps
/// and the soft-delete marker. Serialized as the nested `model` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
  #[serde(rename = "ID")]
  pub id: i64,
  #[serde(rename = "CreatedAt")]
  pub created_at: DateTime<Utc>,
  #[serde(rename = "UpdatedAt")]
  pub updated_at: DateTime<Utc>,
  #[serde(rename = "DeletedAt")]
  pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
  pub fn is_deleted(&self) -> bool {
    self.deleted_at.is_some()
  }
}

/// One tracked operational issue. Written by the upstream ticketing sync; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
  pub model: RecordMeta,
  /// Business identifier (e.g. "INC0012345"). Indexed, not unique.
  pub number: String,
  pub incident_state: String,
  pub active: bool,
  pub caller_id: String,
  pub opened_by: String,
  pub opened_at: DateTime<Utc>,
  pub contact_type: String,
  pub location: String,
  pub category: String,
  pub urgency: String,
  pub assignment_group: String,
  pub closed_code: String,
  pub closed_at: Option<DateTime<Utc>>,
}

impl<'r> FromRow<'r, PgRow> for Incident {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx_core::Error> {
    Ok(Self {
      model: RecordMeta {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
      },
      number: row.try_get("number")?,
      incident_state: row.try_get("incident_state")?,
      active: row.try_get("active")?,
      caller_id: row.try_get("caller_id")?,
      opened_by: row.try_get("opened_by")?,
      opened_at: row.try_get("opened_at")?,
      contact_type: row.try_get("contact_type")?,
      location: row.try_get("location")?,
      category: row.try_get("category")?,
      urgency: row.try_get("urgency")?,
      assignment_group: row.try_get("assignment_group")?,
      closed_code: row.try_get("closed_code")?,
      closed_at: row.try_get("closed_at")?,
    })
  }
}
