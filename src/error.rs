//! Store error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`StoreError`], used by callers that map
/// failures onto responses (HTTP status codes, exit messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The referenced product or waste entry does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The operation would break a uniqueness rule.
    #[error("{0}")]
    Conflict(String),

    /// I/O error reading or writing the backing file.
    #[error("I/O error for {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file is valid JSON but not a readable document.
    #[error("Unreadable data in {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be serialized.
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The seed catalog asset is unreadable or invalid.
    #[error("Invalid seed catalog: {0}")]
    Catalog(String),
}

impl StoreError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
            StoreError::Storage { .. }
            | StoreError::Corrupt { .. }
            | StoreError::Serialize(_)
            | StoreError::Catalog(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
