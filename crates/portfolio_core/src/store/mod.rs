//! Local fallback store: the degraded-mode cache behind every provider.
//!
//! # Responsibility
//! - Define the synchronous key-value contract providers mirror into.
//! - Provide typed JSON snapshot helpers on top of it.
//!
//! # Invariants
//! - Keys are fixed per resource kind (see the `*_KEY` constants).
//! - Writes are last-write-wins; no transaction spans remote and local writes.

mod memory;
mod sqlite;

pub use memory::MemoryFallbackStore;
pub use sqlite::SqliteFallbackStore;

use crate::db::DbError;
use crate::model::ResourceKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot of the full project collection.
pub const PROJECTS_KEY: &str = "portfolio.projects";
/// Snapshot of the full certificate collection.
pub const CERTIFICATES_KEY: &str = "portfolio.certificates";
/// Snapshot of the profile singleton.
pub const PROFILE_KEY: &str = "portfolio.profile";
/// Standalone profile picture URL, kept apart from the profile snapshot.
pub const PROFILE_PICTURE_KEY: &str = "portfolio.profile_picture";

/// Snapshot key for one resource kind.
pub fn snapshot_key(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Project => PROJECTS_KEY,
        ResourceKind::Certificate => CERTIFICATES_KEY,
        ResourceKind::Profile => PROFILE_KEY,
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Stored value is not valid JSON for the requested shape.
    Corrupt {
        key: String,
        message: String,
    },
    Serialize(serde_json::Error),
    /// A previous holder of the connection lock panicked.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Corrupt { key, message } => {
                write!(f, "corrupt fallback entry `{key}`: {message}")
            }
            Self::Serialize(err) => write!(f, "failed to encode fallback entry: {err}"),
            Self::Poisoned => write!(f, "fallback store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Corrupt { .. } | Self::Poisoned => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous key-value persistence used as a degraded-mode cache.
pub trait FallbackStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Reads and decodes a JSON entry. `Ok(None)` when the key is absent.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn FallbackStore,
    key: &str,
) -> StoreResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StoreError::Corrupt {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Encodes and writes a JSON entry.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn FallbackStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value).map_err(StoreError::Serialize)?;
    store.set(key, &raw)
}
