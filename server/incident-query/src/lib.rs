//! Incident Query Service
//!
//! Read-only HTTP interface over the `incidents` table: whitelisted equality
//! filters, page/limit pagination and lookup by incident number.

mod app;
pub mod config;
pub mod error;
pub mod filter;
mod handlers;
pub mod pagination;
pub mod secret;
pub mod shutdown;
mod state;
pub mod store;
pub mod types;

pub use app::app;
pub use config::Config;
pub use error::{ConfigError, SecretError, StartupError, StoreError};
pub use filter::{FilterField, Filters};
pub use pagination::Pagination;
pub use state::AppState;
pub use store::{IncidentStore, MemoryIncidentStore, PgIncidentStore};
pub use types::{Incident, RecordMeta};
