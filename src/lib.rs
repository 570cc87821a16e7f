//! Waste tracking store.
//!
//! A product catalog and a waste ledger persisted together in one JSON
//! document, plus cost reports over the ledger.

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod server;
pub mod store;

pub use config::{Config, ConfigError, ConfigSource, ConfigValue};
pub use error::{ErrorKind, Result, StoreError};
pub use models::{
    Catalog, Document, Numeric, OrderedMap, Product, ProductDetails, ProductInput, WasteEntry,
    WasteInput,
};
pub use report::{DateRange, Summary};
pub use store::{Saved, SeedCatalog, Store};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
