//! Read access to the incident table.
//!
//! Handlers only see [`IncidentStore`]; the PostgreSQL implementation is used
//! in production and the in-memory one backs tests and local demos. Both
//! exclude soft-deleted rows and return results ordered by record id.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::filter::Filters;
use crate::pagination::Pagination;
use crate::types::Incident;

pub use memory::MemoryIncidentStore;
pub use postgres::PgIncidentStore;

#[async_trait]
pub trait IncidentStore: Send + Sync {
  /// All incidents matching every filter, within the page window.
  async fn list(&self, filters: &Filters, page: Pagination) -> Result<Vec<Incident>, StoreError>;

  /// Incidents whose number equals `number` exactly. Zero or more.
  async fn by_number(&self, number: &str, page: Pagination) -> Result<Vec<Incident>, StoreError>;
}
