//! Remote data service contracts.
//!
//! # Responsibility
//! - Define the per-kind CRUD contract providers call.
//! - Keep wire naming (snake_case) and transport details out of providers.
//!
//! # Invariants
//! - Every failure is reported as `RemoteError`; adapters never panic.
//! - Adapters receive already prepared (normalized, validated) input.

mod http;
pub mod wire;

pub use http::HttpRemote;

use crate::model::certificate::Certificate;
use crate::model::profile::{Profile, ProfilePatch};
use crate::model::project::Project;
use crate::model::{Resource, ResourceId, ResourceKind};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote data service failure. Every variant maps to `NetworkFailure` at the
/// provider level.
#[derive(Debug)]
pub enum RemoteError {
    /// Endpoint or key unset or still a placeholder; no request was sent.
    NotConfigured,
    Http(reqwest::Error),
    /// Non-2xx response.
    Status { status: u16, message: String },
    /// Response body did not match the expected shape.
    Decode(String),
    /// A write returned no row, e.g. the target id does not exist remotely.
    EmptyResponse(&'static str),
}

impl RemoteError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Short machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "remote_not_configured",
            Self::Http(_) => "remote_unreachable",
            Self::Status { .. } => "remote_status",
            Self::Decode(_) => "remote_decode",
            Self::EmptyResponse(_) => "remote_empty_response",
        }
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "remote data service is not configured"),
            Self::Http(err) => write!(f, "remote request failed: {err}"),
            Self::Status { status, message } => {
                write!(f, "remote responded with status {status}: {message}")
            }
            Self::Decode(message) => write!(f, "unexpected remote response: {message}"),
            Self::EmptyResponse(operation) => write!(f, "remote {operation} returned no record"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Per-kind CRUD contract for collection resources.
#[async_trait]
pub trait CollectionRemote<R: Resource>: Send + Sync {
    /// All records, in the service's order. Empty when none exist.
    async fn get_all(&self) -> RemoteResult<Vec<R>>;
    /// Creates a record and returns it with the service-assigned id.
    async fn add(&self, draft: &R::Draft) -> RemoteResult<R>;
    async fn update(&self, id: &ResourceId, patch: &R::Patch) -> RemoteResult<R>;
    /// Returns whether a record was deleted.
    async fn delete(&self, id: &ResourceId) -> RemoteResult<bool>;
}

/// Singleton contract for the profile.
#[async_trait]
pub trait ProfileRemote: Send + Sync {
    async fn get_profile(&self) -> RemoteResult<Option<Profile>>;
    async fn update_profile(&self, patch: &ProfilePatch) -> RemoteResult<Profile>;
    /// Overwrites every profile field, clearing optional fields `profile`
    /// leaves empty.
    async fn replace_profile(&self, profile: &Profile) -> RemoteResult<Profile>;
}

/// Binary media uploaded for a resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AssetUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Media storage; returns public URLs.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload_asset(&self, kind: ResourceKind, upload: &AssetUpload) -> RemoteResult<String>;
}

/// Everything the application root needs from one remote service.
pub trait RemoteService:
    CollectionRemote<Project> + CollectionRemote<Certificate> + ProfileRemote + AssetStore
{
}

impl<T> RemoteService for T where
    T: CollectionRemote<Project> + CollectionRemote<Certificate> + ProfileRemote + AssetStore
{
}
