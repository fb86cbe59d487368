//! Collection provider shared by projects and certificates.
//!
//! # Responsibility
//! - Load the collection with the remote → snapshot → defaults chain.
//! - Apply CRUD through the remote service, degrading to optimistic local
//!   mutations when it fails.
//! - Mirror the whole collection into the fallback store after every change.
//!
//! # Invariants
//! - Ids are unique within `items`; duplicates from any source are dropped,
//!   first occurrence wins.
//! - Locally synthesized ids are epoch milliseconds and never collide with an
//!   id already in `items`.
//! - Unknown ids on update/delete/duplicate/toggle are silent no-ops.
//! - Delete always removes locally, even when the remote delete fails; local
//!   and remote state may then diverge until the next successful load.

use super::state::StateCell;
use super::{ErrorKind, LoadSource, ProviderError, ProviderIssue, ProviderResult};
use crate::model::certificate::Certificate;
use crate::model::project::Project;
use crate::model::{InsertPosition, Resource, ResourceDraft, ResourceId, ResourcePatch};
use crate::remote::{AssetStore, AssetUpload, CollectionRemote, RemoteError};
use crate::store::{read_json, snapshot_key, write_json, FallbackStore};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

const COPY_SUFFIX: &str = " (Copy)";

pub type ProjectProvider = CollectionProvider<Project>;
pub type CertificateProvider = CollectionProvider<Certificate>;

/// Published state of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<R> {
    pub items: Vec<R>,
    pub is_loading: bool,
    pub last_error: Option<ProviderIssue>,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            last_error: None,
        }
    }
}

/// Owner of one resource kind's collection.
pub struct CollectionProvider<R: Resource> {
    remote: Arc<dyn CollectionRemote<R>>,
    assets: Option<Arc<dyn AssetStore>>,
    store: Arc<dyn FallbackStore>,
    state: StateCell<CollectionState<R>>,
}

impl<R: Resource> CollectionProvider<R> {
    /// Creates an empty, mounted provider. Call `load` to populate it.
    pub fn new(remote: Arc<dyn CollectionRemote<R>>, store: Arc<dyn FallbackStore>) -> Self {
        Self {
            remote,
            assets: None,
            store,
            state: StateCell::new(CollectionState::default()),
        }
    }

    /// Enables `upload_asset` through the given media store.
    pub fn with_assets(mut self, assets: Arc<dyn AssetStore>) -> Self {
        self.assets = Some(assets);
        self
    }

    // ---- reads ---------------------------------------------------------

    pub fn items(&self) -> Vec<R> {
        self.state.read(|state| state.items.clone())
    }

    pub fn len(&self) -> usize {
        self.state.read(|state| state.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> CollectionState<R> {
        self.state.read(Clone::clone)
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|state| state.is_loading)
    }

    pub fn last_error(&self) -> Option<ProviderIssue> {
        self.state.read(|state| state.last_error.clone())
    }

    /// Receiver that observes every published state replacement.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState<R>> {
        self.state.subscribe()
    }

    /// Pure lookup; never mutates state.
    pub fn get_by_id(&self, id: &ResourceId) -> Option<R> {
        self.state
            .read(|state| state.items.iter().find(|item| item.id() == id).cloned())
    }

    // ---- lifecycle -----------------------------------------------------

    /// Loads the collection: remote, then mirrored snapshot, then defaults.
    pub async fn load(&self) -> LoadSource {
        let started_at = Instant::now();
        let kind = R::KIND.as_str();
        self.state.publish(|state| state.is_loading = true);

        let (items, issue, source) = match self.remote.get_all().await {
            Ok(records) if records.is_empty() => (R::defaults(), None, LoadSource::Defaults),
            Ok(records) => (canonicalize(records), None, LoadSource::Remote),
            Err(err) => {
                warn!(
                    "event=provider_load module=provider kind={kind} status=degraded error_code={}",
                    err.code()
                );
                let issue = Some(ProviderIssue::network(&err));
                match self.read_snapshot() {
                    Some(items) => (items, issue, LoadSource::Snapshot),
                    None => (R::defaults(), issue, LoadSource::Defaults),
                }
            }
        };

        let count = items.len();
        self.state.publish(|state| {
            state.items = items;
            state.is_loading = false;
            state.last_error = issue;
        });
        if source == LoadSource::Remote {
            self.mirror();
        }

        info!(
            "event=provider_load module=provider kind={kind} status=ok source={} count={count} duration_ms={}",
            source.as_str(),
            started_at.elapsed().as_millis()
        );
        source
    }

    /// Re-runs `load`; the only retry path after a failure.
    pub async fn refresh(&self) -> LoadSource {
        self.load().await
    }

    /// Stops publishing state; later completions become no-ops.
    pub fn unmount(&self) {
        self.state.unmount();
    }

    pub fn clear_error(&self) {
        self.state.publish(|state| state.last_error = None);
    }

    // ---- mutations -----------------------------------------------------

    /// Creates a record.
    ///
    /// On remote failure the record is kept locally under a synthesized id
    /// and `last_error` is set; it will not survive a fresh `load`.
    pub async fn add(&self, draft: R::Draft) -> ProviderResult<R> {
        let draft = self.validated(draft.prepare())?;

        match self.remote.add(&draft).await {
            Ok(mut record) => {
                record.normalize();
                let stored = record.clone();
                self.state.publish(move |state| {
                    // Why: a remote that echoes an existing id would otherwise
                    // leave two rows sharing one id in the collection.
                    state.items.retain(|item| item.id() != stored.id());
                    match R::INSERT_AT {
                        InsertPosition::Front => state.items.insert(0, stored),
                        InsertPosition::Back => state.items.push(stored),
                    }
                    state.last_error = None;
                });
                self.mirror();
                self.log_write("add", "ok", record.id());
                Ok(record)
            }
            Err(err) => {
                let record = R::from_draft(self.next_local_id(), draft);
                let stored = record.clone();
                let issue = ProviderIssue::network(&err);
                self.state.publish(move |state| {
                    state.items.push(stored);
                    state.last_error = Some(issue);
                });
                self.mirror();
                self.log_degraded("add", &err, record.id());
                Ok(record)
            }
        }
    }

    /// Patches a record. Returns `Ok(None)` when `id` is unknown.
    pub async fn update(&self, id: &ResourceId, patch: R::Patch) -> ProviderResult<Option<R>> {
        let patch = self.validated(patch.prepare())?;
        let Some(current) = self.get_by_id(id) else {
            self.log_write("update", "not_found", id);
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(current));
        }

        match self.remote.update(id, &patch).await {
            Ok(mut record) => {
                record.normalize();
                let stored = record.clone();
                self.state.publish(|state| {
                    if let Some(slot) = state.items.iter_mut().find(|item| item.id() == id) {
                        *slot = stored;
                    }
                    state.last_error = None;
                });
                self.mirror();
                self.log_write("update", "ok", id);
                Ok(Some(record))
            }
            Err(err) => {
                let issue = ProviderIssue::network(&err);
                self.state.publish(|state| {
                    if let Some(slot) = state.items.iter_mut().find(|item| item.id() == id) {
                        slot.apply_patch(&patch);
                    }
                    state.last_error = Some(issue);
                });
                self.mirror();
                self.log_degraded("update", &err, id);

                let mut local = current;
                local.apply_patch(&patch);
                Ok(Some(self.get_by_id(id).unwrap_or(local)))
            }
        }
    }

    /// Removes a record. Returns whether anything was removed locally.
    pub async fn delete(&self, id: &ResourceId) -> bool {
        if self.get_by_id(id).is_none() {
            self.log_write("delete", "not_found", id);
            return false;
        }

        let outcome = self.remote.delete(id).await;
        let issue = outcome.as_ref().err().map(ProviderIssue::network);
        self.state.publish(|state| {
            state.items.retain(|item| item.id() != id);
            state.last_error = issue;
        });
        self.mirror();

        match outcome {
            Ok(true) => self.log_write("delete", "ok", id),
            Ok(false) => self.log_write("delete", "local_only", id),
            Err(err) => self.log_degraded("delete", &err, id),
        }
        true
    }

    /// Adds a copy of a record titled `"<title> (Copy)"` via `add`.
    pub async fn duplicate(&self, id: &ResourceId) -> ProviderResult<Option<R>> {
        let Some(source) = self.get_by_id(id) else {
            self.log_write("duplicate", "not_found", id);
            return Ok(None);
        };
        let mut draft = source.to_draft();
        let title = format!("{}{COPY_SUFFIX}", draft.title());
        draft.set_title(title);
        self.add(draft).await.map(Some)
    }

    /// Inverts `featured` via `update`.
    pub async fn toggle_featured(&self, id: &ResourceId) -> ProviderResult<Option<R>> {
        let Some(current) = self.get_by_id(id) else {
            self.log_write("toggle_featured", "not_found", id);
            return Ok(None);
        };
        self.update(id, R::featured_patch(!current.is_featured()))
            .await
    }

    /// Restores built-in content locally and overwrites the mirror.
    ///
    /// The remote service is not touched.
    pub fn reset_to_defaults(&self) {
        self.state.publish(|state| {
            state.items = R::defaults();
            state.last_error = None;
        });
        self.mirror();
        info!(
            "event=provider_reset module=provider kind={} status=ok",
            R::KIND.as_str()
        );
    }

    /// Uploads media for this kind and returns its public URL.
    pub async fn upload_asset(&self, upload: AssetUpload) -> ProviderResult<String> {
        let uploaded = match self.assets.as_ref() {
            Some(assets) => assets.upload_asset(R::KIND, &upload).await,
            None => Err(RemoteError::NotConfigured),
        };
        match uploaded {
            Ok(url) => {
                info!(
                    "event=provider_upload module=provider kind={} status=ok bytes={}",
                    R::KIND.as_str(),
                    upload.bytes.len()
                );
                Ok(url)
            }
            Err(err) => {
                warn!(
                    "event=provider_upload module=provider kind={} status=error error_code={}",
                    R::KIND.as_str(),
                    err.code()
                );
                let issue = ProviderIssue::network(&err);
                self.state.publish(|state| state.last_error = Some(issue));
                Err(ProviderError::Network(err))
            }
        }
    }

    // ---- backup --------------------------------------------------------

    /// Serializes the collection as snapshot JSON (camelCase).
    pub fn export_json(&self) -> ProviderResult<String> {
        let items = self.items();
        serde_json::to_string_pretty(&items)
            .map_err(|err| ProviderError::InvalidSnapshot(err.to_string()))
    }

    /// Replaces the collection from snapshot JSON and mirrors it.
    ///
    /// Local only, like `reset_to_defaults`. Returns the imported count.
    pub fn import_json(&self, json: &str) -> ProviderResult<usize> {
        let records: Vec<R> = serde_json::from_str(json).map_err(|err| {
            let error = ProviderError::InvalidSnapshot(err.to_string());
            self.record_issue(ErrorKind::ValidationFailure, error.to_string());
            error
        })?;
        let items = canonicalize(records);
        let count = items.len();
        self.state.publish(|state| {
            state.items = items;
            state.last_error = None;
        });
        self.mirror();
        info!(
            "event=provider_import module=provider kind={} status=ok count={count}",
            R::KIND.as_str()
        );
        Ok(count)
    }

    // ---- internals -----------------------------------------------------

    fn validated<T>(&self, prepared: Result<T, crate::model::ValidationError>) -> ProviderResult<T> {
        prepared.map_err(|err| {
            debug!(
                "event=provider_validate module=provider kind={} status=rejected field={}",
                R::KIND.as_str(),
                err.field()
            );
            self.record_issue(ErrorKind::ValidationFailure, err.to_string());
            ProviderError::Validation(err)
        })
    }

    fn record_issue(&self, kind: ErrorKind, message: String) {
        self.state
            .publish(|state| state.last_error = Some(ProviderIssue::new(kind, message)));
    }

    fn read_snapshot(&self) -> Option<Vec<R>> {
        match read_json::<Vec<R>>(self.store.as_ref(), snapshot_key(R::KIND)) {
            Ok(Some(records)) => Some(canonicalize(records)),
            Ok(None) => None,
            Err(err) => {
                warn!(
                    "event=snapshot_read module=provider kind={} status=error error={err}",
                    R::KIND.as_str()
                );
                None
            }
        }
    }

    /// Writes the current collection to the fallback store. Failures are
    /// logged only; the cache is best-effort.
    fn mirror(&self) {
        if !self.state.is_mounted() {
            return;
        }
        let items = self.items();
        if let Err(err) = write_json(self.store.as_ref(), snapshot_key(R::KIND), &items) {
            warn!(
                "event=snapshot_write module=provider kind={} status=error error={err}",
                R::KIND.as_str()
            );
        }
    }

    /// Timestamp-based id that is not yet used in the collection.
    fn next_local_id(&self) -> ResourceId {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default();
        self.state.read(|state| {
            let taken: HashSet<&ResourceId> = state.items.iter().map(|item| item.id()).collect();
            let mut candidate = now_ms;
            while taken.contains(&ResourceId::from(candidate)) {
                candidate += 1;
            }
            ResourceId::from(candidate)
        })
    }

    fn log_write(&self, operation: &str, status: &str, id: &ResourceId) {
        info!(
            "event=provider_{operation} module=provider kind={} status={status} id={id}",
            R::KIND.as_str()
        );
    }

    fn log_degraded(&self, operation: &str, err: &RemoteError, id: &ResourceId) {
        warn!(
            "event=provider_{operation} module=provider kind={} status=degraded id={id} error_code={}",
            R::KIND.as_str(),
            err.code()
        );
    }
}

/// Normalizes list fields and drops records whose id was already seen.
fn canonicalize<R: Resource>(records: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::new();
    let total = records.len();
    let items: Vec<R> = records
        .into_iter()
        .filter_map(|mut record| {
            // Why: first occurrence wins so the remote's own ordering decides
            // which duplicate survives.
            if !seen.insert(record.id().clone()) {
                return None;
            }
            record.normalize();
            Some(record)
        })
        .collect();
    if items.len() != total {
        warn!(
            "event=provider_dedupe module=provider kind={} dropped={}",
            R::KIND.as_str(),
            total - items.len()
        );
    }
    items
}
