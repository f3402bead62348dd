//! Error types shared by the zone engine and the settings store

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A zone identifier that the time-zone database does not know
///
/// Fatal to the single card that asked for it, never to the app.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time zone identifier: {identifier}")]
pub struct ZoneResolutionError {
    pub identifier: String,
}

impl ZoneResolutionError {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Errors raised while reading or writing persisted records
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record {record}: {message}")]
    Parse { record: String, message: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode record {record}: {message}")]
    Serialize { record: String, message: String },
}

impl PersistenceError {
    /// Stored state was missing or malformed; callers revert to defaults
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            PersistenceError::Read { .. } | PersistenceError::Parse { .. }
        )
    }

    /// A write was lost; in-memory state is still authoritative
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            PersistenceError::Write { .. } | PersistenceError::Serialize { .. }
        )
    }
}
