use async_trait::async_trait;

use super::IncidentStore;
use crate::error::StoreError;
use crate::filter::Filters;
use crate::pagination::Pagination;
use crate::types::Incident;

/// Fixed in-process snapshot of the incident table.
#[derive(Debug, Clone, Default)]
pub struct MemoryIncidentStore {
  rows: Vec<Incident>,
}

impl MemoryIncidentStore {
  pub fn new(mut rows: Vec<Incident>) -> Self {
    rows.sort_by_key(|i| i.model.id);
    Self { rows }
  }

  fn select(&self, page: Pagination, pred: impl Fn(&Incident) -> bool) -> Vec<Incident> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    self
      .rows
      .iter()
      .filter(|i| !i.model.is_deleted())
      .filter(|i| pred(*i))
      .skip(offset)
      .take(limit)
      .cloned()
      .collect()
  }
}

#[async_trait]
impl IncidentStore for MemoryIncidentStore {
  async fn list(&self, filters: &Filters, page: Pagination) -> Result<Vec<Incident>, StoreError> {
    Ok(self.select(page, |i| filters.matches(i)))
  }

  async fn by_number(&self, number: &str, page: Pagination) -> Result<Vec<Incident>, StoreError> {
    Ok(self.select(page, |i| i.number == number))
  }
}
