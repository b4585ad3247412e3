//! Persistence module split across logical submodules.

mod connection;
mod products;

use thiserror::Error;

pub use connection::{create_schema, ensure_schema, open_catalog, OpenedCatalog};
pub use products::{fetch_product, fetch_products, find_product, insert_products};

/// Failure talking to the embedded store. The seeder treats every variant as
/// recoverable: the catalog stays empty and the next launch retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable while {action}: {source}")]
    StorageUnavailable {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub(crate) fn unavailable(action: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::StorageUnavailable { action, source }
    }
}
