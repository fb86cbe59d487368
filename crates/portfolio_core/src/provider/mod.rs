//! Resource providers: the single writer of each resource kind's content.
//!
//! # Responsibility
//! - Own the in-memory collection (or profile singleton) per kind.
//! - Route every mutation through the remote service, mirroring results into
//!   the local fallback store.
//! - Recover from remote failures into local/default state and publish the
//!   failure as `last_error` instead of returning it.
//!
//! # Invariants
//! - Validation runs before any remote call and is returned to the caller.
//! - Remote failures never surface as `Err` from CRUD operations.
//! - `is_loading` is cleared on every load completion path.
//! - State replacement is synchronous; no lock is held across an await.

pub mod collection;
pub mod profile;
mod state;

pub use collection::{CertificateProvider, CollectionProvider, CollectionState, ProjectProvider};
pub use profile::{ProfileProvider, ProfileState};

use crate::model::ValidationError;
use crate::remote::RemoteError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure class published in provider state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Remote service unreachable, unconfigured or returned an error.
    NetworkFailure,
    /// Caller input rejected before any remote call.
    ValidationFailure,
    /// Operation targeted an unknown id. Reserved; providers treat this as a
    /// silent no-op and do not publish it.
    NotFound,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkFailure => "network_failure",
            Self::ValidationFailure => "validation_failure",
            Self::NotFound => "not_found",
        }
    }
}

/// Last failure observed by a provider, for optional display by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIssue {
    pub kind: ErrorKind,
    pub message: String,
}

impl ProviderIssue {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn network(err: &RemoteError) -> Self {
        Self::new(ErrorKind::NetworkFailure, err.to_string())
    }
}

/// Where the current content came from after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    /// Remote failed; a mirrored snapshot was used.
    Snapshot,
    /// Built-in content (empty remote, or failure with no snapshot).
    Defaults,
}

impl LoadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Snapshot => "snapshot",
            Self::Defaults => "defaults",
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors a provider returns to its caller.
#[derive(Debug)]
pub enum ProviderError {
    Validation(ValidationError),
    /// Only for operations without a local fallback (asset uploads).
    Network(RemoteError),
    /// Imported snapshot JSON could not be decoded.
    InvalidSnapshot(String),
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidSnapshot(_) => ErrorKind::ValidationFailure,
            Self::Network(_) => ErrorKind::NetworkFailure,
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Network(err) => write!(f, "{err}"),
            Self::InvalidSnapshot(message) => write!(f, "invalid snapshot: {message}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Network(err) => Some(err),
            Self::InvalidSnapshot(_) => None,
        }
    }
}

impl From<ValidationError> for ProviderError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RemoteError> for ProviderError {
    fn from(value: RemoteError) -> Self {
        Self::Network(value)
    }
}
