//! Shared handler state.

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::store::IncidentStore;

pub struct AppState {
  pub store: Arc<dyn IncidentStore>,
  pub max_page_size: NonZeroU32,
}

impl AppState {
  pub fn new(store: Arc<dyn IncidentStore>, max_page_size: NonZeroU32) -> Self {
    Self {
      store,
      max_page_size,
    }
  }
}
