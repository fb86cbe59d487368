//! Profile singleton provider.
//!
//! # Invariants
//! - Exactly one profile is held at any time; it starts as the built-in one.
//! - The profile picture URL is also mirrored under its own fallback key so
//!   a picture uploaded while degraded survives a profile snapshot miss.
//! - Reset is the only provider reset that also tries to overwrite the remote.

use super::state::StateCell;
use super::{ErrorKind, LoadSource, ProviderError, ProviderIssue, ProviderResult};
use crate::model::profile::{Profile, ProfilePatch};
use crate::model::ResourceKind;
use crate::remote::{AssetStore, AssetUpload, ProfileRemote, RemoteError};
use crate::store::{read_json, write_json, FallbackStore, PROFILE_KEY, PROFILE_PICTURE_KEY};
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

const KIND: &str = "profile";

/// Published profile state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    pub profile: Profile,
    pub is_loading: bool,
    pub last_error: Option<ProviderIssue>,
}

/// Owner of the profile singleton.
pub struct ProfileProvider {
    remote: Arc<dyn ProfileRemote>,
    assets: Option<Arc<dyn AssetStore>>,
    store: Arc<dyn FallbackStore>,
    state: StateCell<ProfileState>,
}

impl ProfileProvider {
    pub fn new(remote: Arc<dyn ProfileRemote>, store: Arc<dyn FallbackStore>) -> Self {
        Self {
            remote,
            assets: None,
            store,
            state: StateCell::new(ProfileState {
                profile: Profile::builtin(),
                is_loading: false,
                last_error: None,
            }),
        }
    }

    pub fn with_assets(mut self, assets: Arc<dyn AssetStore>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn profile(&self) -> Profile {
        self.state.read(|state| state.profile.clone())
    }

    pub fn snapshot(&self) -> ProfileState {
        self.state.read(Clone::clone)
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|state| state.is_loading)
    }

    pub fn last_error(&self) -> Option<ProviderIssue> {
        self.state.read(|state| state.last_error.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    pub fn unmount(&self) {
        self.state.unmount();
    }

    pub fn clear_error(&self) {
        self.state.publish(|state| state.last_error = None);
    }

    /// Loads the profile: remote, then mirrored snapshot, then built-in.
    pub async fn load(&self) -> LoadSource {
        let started_at = Instant::now();
        self.state.publish(|state| state.is_loading = true);

        let (profile, issue, source) = match self.remote.get_profile().await {
            Ok(Some(mut profile)) => {
                profile.normalize();
                (profile, None, LoadSource::Remote)
            }
            Ok(None) => (Profile::builtin(), None, LoadSource::Defaults),
            Err(err) => {
                warn!(
                    "event=provider_load module=provider kind={KIND} status=degraded error_code={}",
                    err.code()
                );
                let issue = Some(ProviderIssue::network(&err));
                let (mut profile, source) = match self.read_snapshot() {
                    Some(profile) => (profile, LoadSource::Snapshot),
                    None => (Profile::builtin(), LoadSource::Defaults),
                };
                if let Some(picture) = self.read_picture() {
                    profile.profile_picture = Some(picture);
                }
                (profile, issue, source)
            }
        };

        self.state.publish(|state| {
            state.profile = profile;
            state.is_loading = false;
            state.last_error = issue;
        });
        if source == LoadSource::Remote {
            self.mirror();
        }

        info!(
            "event=provider_load module=provider kind={KIND} status=ok source={} duration_ms={}",
            source.as_str(),
            started_at.elapsed().as_millis()
        );
        source
    }

    pub async fn refresh(&self) -> LoadSource {
        self.load().await
    }

    /// Applies a field-level update; degrades to a local patch on failure.
    pub async fn update(&self, patch: ProfilePatch) -> ProviderResult<Profile> {
        let patch = match patch.prepare() {
            Ok(patch) => patch,
            Err(err) => {
                self.record_issue(ErrorKind::ValidationFailure, err.to_string());
                return Err(ProviderError::Validation(err));
            }
        };
        if patch.is_empty() {
            return Ok(self.profile());
        }

        match self.remote.update_profile(&patch).await {
            Ok(mut profile) => {
                profile.normalize();
                let stored = profile.clone();
                self.state.publish(move |state| {
                    state.profile = stored;
                    state.last_error = None;
                });
                self.mirror();
                info!("event=provider_update module=provider kind={KIND} status=ok");
                Ok(profile)
            }
            Err(err) => {
                warn!(
                    "event=provider_update module=provider kind={KIND} status=degraded error_code={}",
                    err.code()
                );
                let issue = ProviderIssue::network(&err);
                let mut local = self.profile();
                local.apply_patch(&patch);
                let stored = local.clone();
                self.state.publish(move |state| {
                    state.profile = stored;
                    state.last_error = Some(issue);
                });
                self.mirror();
                Ok(local)
            }
        }
    }

    /// Uploads a new picture, stores its URL on the profile and returns it.
    pub async fn upload_profile_picture(&self, upload: AssetUpload) -> ProviderResult<String> {
        let uploaded = match self.assets.as_ref() {
            Some(assets) => assets.upload_asset(ResourceKind::Profile, &upload).await,
            None => Err(RemoteError::NotConfigured),
        };
        let url = match uploaded {
            Ok(url) => url,
            Err(err) => {
                warn!(
                    "event=provider_upload module=provider kind={KIND} status=error error_code={}",
                    err.code()
                );
                self.record_issue(ErrorKind::NetworkFailure, err.to_string());
                return Err(ProviderError::Network(err));
            }
        };

        if self.state.is_mounted() {
            if let Err(err) = self.store.set(PROFILE_PICTURE_KEY, &url) {
                warn!("event=snapshot_write module=provider kind={KIND} status=error error={err}");
            }
        }
        self.update(ProfilePatch::default().profile_picture(url.clone()))
            .await?;
        Ok(url)
    }

    /// Restores the built-in profile locally and tries to push it remotely.
    pub async fn reset_to_defaults(&self) {
        let builtin = Profile::builtin();
        let stored = builtin.clone();
        self.state.publish(move |state| {
            state.profile = stored;
            state.last_error = None;
        });
        self.mirror();
        if self.state.is_mounted() {
            if let Err(err) = self.store.remove(PROFILE_PICTURE_KEY) {
                warn!("event=snapshot_write module=provider kind={KIND} status=error error={err}");
            }
        }

        match self.remote.replace_profile(&builtin).await {
            Ok(_) => info!("event=provider_reset module=provider kind={KIND} status=ok"),
            Err(err) => {
                warn!(
                    "event=provider_reset module=provider kind={KIND} status=local_only error_code={}",
                    err.code()
                );
                self.record_issue(ErrorKind::NetworkFailure, err.to_string());
            }
        }
    }

    fn record_issue(&self, kind: ErrorKind, message: String) {
        self.state
            .publish(|state| state.last_error = Some(ProviderIssue::new(kind, message)));
    }

    fn read_snapshot(&self) -> Option<Profile> {
        match read_json::<Profile>(self.store.as_ref(), PROFILE_KEY) {
            Ok(Some(mut profile)) => {
                profile.normalize();
                Some(profile)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("event=snapshot_read module=provider kind={KIND} status=error error={err}");
                None
            }
        }
    }

    fn read_picture(&self) -> Option<String> {
        match self.store.get(PROFILE_PICTURE_KEY) {
            Ok(value) => value.filter(|url| !url.trim().is_empty()),
            Err(err) => {
                warn!("event=snapshot_read module=provider kind={KIND} status=error error={err}");
                None
            }
        }
    }

    fn mirror(&self) {
        if !self.state.is_mounted() {
            return;
        }
        let profile = self.profile();
        if let Err(err) = write_json(self.store.as_ref(), PROFILE_KEY, &profile) {
            warn!("event=snapshot_write module=provider kind={KIND} status=error error={err}");
        }
        if let Some(picture) = profile.profile_picture.as_deref() {
            if let Err(err) = self.store.set(PROFILE_PICTURE_KEY, picture) {
                warn!("event=snapshot_write module=provider kind={KIND} status=error error={err}");
            }
        }
    }
}
