//! Content data layer for the portfolio site.
//! Providers here are the single source of truth for projects, certificates
//! and the profile.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod query;
pub mod remote;
pub mod store;

pub use app::{AppError, LoadReport, PortfolioApp};
pub use config::{AppConfig, RemoteConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::certificate::{Certificate, CertificateDraft, CertificatePatch};
pub use model::list::ListInput;
pub use model::profile::{Profile, ProfilePatch};
pub use model::project::{Project, ProjectDraft, ProjectPatch};
pub use model::{Resource, ResourceId, ResourceKind, ValidationError};
pub use provider::{
    CertificateProvider, CollectionProvider, CollectionState, ErrorKind, LoadSource,
    ProfileProvider, ProfileState, ProjectProvider, ProviderError, ProviderIssue, ProviderResult,
};
pub use query::{category_counts, CategoryFilter, CollectionQuery, SortOrder};
pub use remote::{
    AssetStore, AssetUpload, CollectionRemote, HttpRemote, ProfileRemote, RemoteError,
    RemoteResult, RemoteService,
};
pub use store::{FallbackStore, MemoryFallbackStore, SqliteFallbackStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
