//! Application root owning the three providers.
//!
//! # Responsibility
//! - Build one remote client and one fallback store and share them across
//!   providers.
//! - Load every resource kind at startup.
//!
//! # Invariants
//! - Providers are independent; one kind's failure never blocks another.

use crate::config::AppConfig;
use crate::model::certificate::Certificate;
use crate::model::project::Project;
use crate::provider::{CertificateProvider, LoadSource, ProfileProvider, ProjectProvider};
use crate::remote::{
    AssetStore, CollectionRemote, HttpRemote, ProfileRemote, RemoteError, RemoteService,
};
use crate::store::{FallbackStore, MemoryFallbackStore, SqliteFallbackStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum AppError {
    Remote(RemoteError),
    Store(StoreError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(err) => write!(f, "remote client setup failed: {err}"),
            Self::Store(err) => write!(f, "fallback store setup failed: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Where each provider's startup content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub projects: LoadSource,
    pub certificates: LoadSource,
    pub profile: LoadSource,
}

/// Root of the data layer.
pub struct PortfolioApp {
    pub projects: ProjectProvider,
    pub certificates: CertificateProvider,
    pub profile: ProfileProvider,
}

impl PortfolioApp {
    /// Wires all providers to one remote service and one fallback store.
    pub fn new<T>(remote: Arc<T>, store: Arc<dyn FallbackStore>) -> Self
    where
        T: RemoteService + 'static,
    {
        let project_remote: Arc<dyn CollectionRemote<Project>> = remote.clone();
        let certificate_remote: Arc<dyn CollectionRemote<Certificate>> = remote.clone();
        let profile_remote: Arc<dyn ProfileRemote> = remote.clone();
        let assets: Arc<dyn AssetStore> = remote;

        Self {
            projects: ProjectProvider::new(project_remote, store.clone())
                .with_assets(assets.clone()),
            certificates: CertificateProvider::new(certificate_remote, store.clone())
                .with_assets(assets.clone()),
            profile: ProfileProvider::new(profile_remote, store).with_assets(assets),
        }
    }

    /// Builds the HTTP remote and the configured fallback store.
    ///
    /// Without a `db_path` the cache lives in memory for this process only.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let remote = HttpRemote::new(config.remote.clone(), config.request_timeout)?;
        if !remote.is_configured() {
            warn!("event=app_config module=app status=degraded reason=remote_not_configured");
        }

        let store: Arc<dyn FallbackStore> = match config.db_path.as_ref() {
            Some(path) => Arc::new(SqliteFallbackStore::open(path)?),
            None => Arc::new(MemoryFallbackStore::new()),
        };
        info!(
            "event=app_config module=app status=ok remote_configured={} persistent_cache={}",
            remote.is_configured(),
            config.db_path.is_some()
        );
        Ok(Self::new(Arc::new(remote), store))
    }

    /// Loads all three kinds concurrently.
    pub async fn load_all(&self) -> LoadReport {
        let (projects, certificates, profile) = tokio::join!(
            self.projects.load(),
            self.certificates.load(),
            self.profile.load()
        );
        LoadReport {
            projects,
            certificates,
            profile,
        }
    }

    /// Stops every provider from publishing further state.
    pub fn unmount(&self) {
        self.projects.unmount();
        self.certificates.unmount();
        self.profile.unmount();
    }
}
