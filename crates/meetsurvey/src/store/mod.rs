//! Contact store backends.
//!
//! - [`rest`]: the hosted CRM, reached over its PostgREST API
//! - [`sqlite`]: a local database file for development
//!
//! [`open_store`] picks one from configuration.

pub mod rest;
pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::contact::ContactStore;
use crate::error::Result;

pub use rest::RestContactStore;
pub use sqlite::SqliteContactStore;

/// Open the contact store selected by `config.store.backend`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the local database
/// cannot be opened.
pub fn open_store(config: &Config) -> Result<Arc<dyn ContactStore>> {
    let store: Arc<dyn ContactStore> = match config.store.backend {
        StoreBackend::Rest => Arc::new(RestContactStore::from_config(config)?),
        StoreBackend::Sqlite => Arc::new(SqliteContactStore::open(config.database_path())?),
    };
    info!(backend = store.name(), "contact store ready");
    Ok(store)
}
