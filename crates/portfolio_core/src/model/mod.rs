//! Portfolio content model shared by providers, adapters and queries.
//!
//! # Responsibility
//! - Define the three resource kinds (project, certificate, profile).
//! - Define the generic `Resource` contract that collection providers use.
//!
//! # Invariants
//! - Every collection record is identified by a `ResourceId` unique within
//!   its kind.
//! - List-shaped fields (`technologies`, `skills`) are always canonical:
//!   ordered, trimmed, non-empty strings.
//! - `featured` defaults to `false` when absent.

pub mod certificate;
pub mod defaults;
pub mod id;
pub mod list;
pub mod profile;
pub mod project;
pub mod validation;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub use id::ResourceId;
pub use validation::ValidationError;

/// The three content kinds managed by the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Project,
    Certificate,
    Profile,
}

impl ResourceKind {
    /// Stable lowercase name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Certificate => "certificate",
            Self::Profile => "profile",
        }
    }

    /// Remote table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Certificate => "certificates",
            Self::Profile => "profile",
        }
    }

    /// Remote storage bucket for uploaded media.
    pub fn asset_bucket(self) -> &'static str {
        match self {
            Self::Project => "project-images",
            Self::Certificate => "certificate-badges",
            Self::Profile => "profile-pictures",
        }
    }
}

/// Where a remotely created record lands in the in-memory collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Newest-first lists.
    Front,
    Back,
}

/// Contract for records held by a collection provider.
///
/// Implemented by `Project` and `Certificate`; the profile singleton has its
/// own provider and does not implement this.
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Creation input: the record minus its id.
    type Draft: ResourceDraft;
    /// Partial field update.
    type Patch: ResourcePatch;

    const KIND: ResourceKind;
    /// Placement of records created by the remote service.
    const INSERT_AT: InsertPosition;

    fn id(&self) -> &ResourceId;
    fn title(&self) -> &str;
    fn is_featured(&self) -> bool;

    /// Builds a record from a prepared draft and an assigned id.
    fn from_draft(id: ResourceId, draft: Self::Draft) -> Self;

    /// Returns every user-supplied field as a draft (id stripped).
    fn to_draft(&self) -> Self::Draft;

    /// Applies a prepared patch in place.
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Patch that sets only the `featured` flag.
    fn featured_patch(featured: bool) -> Self::Patch;

    /// Built-in content shown when the remote store holds nothing.
    fn defaults() -> Vec<Self>;

    /// Re-applies list normalization to a record read from an untrusted
    /// source (snapshot import, remote rows).
    fn normalize(&mut self);
}

/// Creation input for a collection record.
pub trait ResourceDraft: Clone + Debug + Send + Sync + 'static {
    /// Normalizes list fields and checks required fields.
    ///
    /// Must be called once at the provider boundary before any network call.
    fn prepare(self) -> Result<Self, ValidationError>;

    fn title(&self) -> &str;

    fn set_title(&mut self, title: String);
}

/// Partial update for a collection record.
pub trait ResourcePatch: Clone + Debug + Send + Sync + 'static {
    /// Normalizes list fields and rejects blanking of required fields.
    fn prepare(self) -> Result<Self, ValidationError>;

    /// Returns whether the patch changes nothing.
    fn is_empty(&self) -> bool;
}
