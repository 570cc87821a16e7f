//! The record store.
//!
//! The whole dataset lives in one JSON document at a fixed path:
//! ```text
//! {
//!   "products": [ { "id", "category", "name", "price", "unit" }, ... ],
//!   "waste": [ { "id", "date", "category", "product", "quantity", "unit", "value" }, ... ],
//!   "nextProductId": 41,
//!   "nextWasteId": 1
//! }
//! ```
//!
//! Every operation loads the document, works on it and, when it changed
//! something, writes it back before returning. Nothing is cached between
//! calls. Calls through one `Store` value are serialized; separate processes
//! sharing the file are last-writer-wins.

mod catalog;
mod products;
mod waste;

pub use catalog::SeedCatalog;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};
use crate::models::Document;

/// Outcome of an upsert: which path was taken, and the record as stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Saved<T> {
    Created(T),
    Updated(T),
}

impl<T> Saved<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Saved::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Saved::Created(v) | Saved::Updated(v) => v,
        }
    }
}

/// File-backed store for the product catalog and the waste ledger.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    catalog: SeedCatalog,
    lock: Mutex<()>,
}

impl Store {
    /// Opens a store at `path`, seeding from the built-in catalog on first use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_catalog(path, SeedCatalog::builtin()?))
    }

    /// Opens a store at `path` that seeds from `catalog` on first use.
    pub fn with_catalog(path: impl Into<PathBuf>, catalog: SeedCatalog) -> Self {
        Self {
            path: path.into(),
            catalog,
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document.
    ///
    /// A missing file, or one that is not JSON at all, is a first run: a
    /// freshly seeded document is written and returned. JSON that does not
    /// decode as a document is reported as [`StoreError::Corrupt`] and the
    /// file is left as it is.
    pub fn load(&self) -> Result<Document> {
        let _guard = self.guard();
        self.load_unlocked()
    }

    /// Replaces the backing file with `doc`.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let _guard = self.guard();
        self.save_unlocked(doc)
    }

    /// Runs a read-only operation against the current document.
    pub(crate) fn read<T>(&self, op: impl FnOnce(&Document) -> T) -> Result<T> {
        let _guard = self.guard();
        let doc = self.load_unlocked()?;
        Ok(op(&doc))
    }

    /// Runs a mutating operation and persists the document if it succeeds.
    pub(crate) fn mutate<T>(&self, op: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let _guard = self.guard();
        let mut doc = self.load_unlocked()?;
        let out = op(&mut doc)?;
        self.save_unlocked(&doc)?;
        Ok(out)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded state is the file itself, so a poisoned lock is still usable.
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load_unlocked(&self) -> Result<Document> {
        match fs::read_to_string(&self.path) {
            // Only text that is not JSON at all counts as a first run. A document
            // that parses but does not decode is left on disk untouched.
            Ok(contents) => match serde_json::from_str::<serde_json::Value>(&contents) {
                Ok(value) => {
                    let doc: Document =
                        serde_json::from_value(value).map_err(|source| StoreError::Corrupt {
                            path: self.path.clone(),
                            source,
                        })?;
                    tracing::debug!(
                        "Loaded {} product(s) and {} waste entries from {}",
                        doc.products.len(),
                        doc.waste.len(),
                        self.path.display()
                    );
                    return Ok(doc);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}, replacing it with the default catalog: {}",
                        self.path.display(),
                        e
                    );
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::storage(&self.path, e)),
        }

        let doc = self.catalog.seed();
        tracing::info!(
            "Initializing {} with {} default product(s)",
            self.path.display(),
            doc.products.len()
        );
        self.save_unlocked(&doc)?;
        Ok(doc)
    }

    fn save_unlocked(&self, doc: &Document) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| StoreError::storage(dir, e))?;

        let contents = serde_json::to_string_pretty(doc)?;

        // Write atomically using a uniquely named temp file + rename
        let mut file = NamedTempFile::new_in(dir).map_err(|e| StoreError::storage(dir, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| StoreError::storage(file.path(), e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| StoreError::storage(file.path(), e))?;
        file.persist(&self.path)
            .map_err(|e| StoreError::storage(&self.path, e.error))?;

        tracing::debug!("Saved document to {}", self.path.display());
        Ok(())
    }
}
