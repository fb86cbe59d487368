#![allow(dead_code)]

use async_trait::async_trait;
use portfolio_core::model::Resource;
use portfolio_core::{
    AssetStore, AssetUpload, Certificate, CollectionRemote, FallbackStore, MemoryFallbackStore,
    Profile, ProfilePatch, ProfileRemote, Project, RemoteError, RemoteResult, ResourceId,
    ResourceKind,
};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory remote service with a failure switch and call counters.
pub struct ScriptedRemote {
    pub projects: Mutex<Vec<Project>>,
    pub certificates: Mutex<Vec<Certificate>>,
    pub profile: Mutex<Option<Profile>>,
    failing: AtomicBool,
    next_id: AtomicI64,
    pub add_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub uploads: Mutex<Vec<(ResourceKind, String)>>,
    read_gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            projects: Mutex::new(Vec::new()),
            certificates: Mutex::new(Vec::new()),
            profile: Mutex::new(None),
            failing: AtomicBool::new(false),
            next_id: AtomicI64::new(100),
            add_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
            read_gate: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        let remote = Self::new();
        remote.set_failing(true);
        remote
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn seed_projects(&self, projects: Vec<Project>) {
        *self.projects.lock().unwrap() = projects;
    }

    pub fn seed_certificates(&self, certificates: Vec<Certificate>) {
        *self.certificates.lock().unwrap() = certificates;
    }

    pub fn seed_profile(&self, profile: Profile) {
        *self.profile.lock().unwrap() = Some(profile);
    }

    /// Makes collection reads wait until the returned handle is notified.
    pub fn hold_reads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.read_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn wait_for_release(&self) {
        let gate = self.read_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn adds(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> RemoteResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::status(503, "service unavailable"))
        } else {
            Ok(())
        }
    }

    fn assign_id(&self) -> ResourceId {
        ResourceId::from(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn get_all_in<R: Resource>(&self, rows: &Mutex<Vec<R>>) -> RemoteResult<Vec<R>> {
        self.check()?;
        Ok(rows.lock().unwrap().clone())
    }

    fn add_in<R: Resource>(&self, rows: &Mutex<Vec<R>>, draft: &R::Draft) -> RemoteResult<R> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let record = R::from_draft(self.assign_id(), draft.clone());
        rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    fn update_in<R: Resource>(
        &self,
        rows: &Mutex<Vec<R>>,
        id: &ResourceId,
        patch: &R::Patch,
    ) -> RemoteResult<R> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = rows.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(RemoteError::EmptyResponse("update"))?;
        record.apply_patch(patch);
        Ok(record.clone())
    }

    fn delete_in<R: Resource>(&self, rows: &Mutex<Vec<R>>, id: &ResourceId) -> RemoteResult<bool> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|record| record.id() != id);
        Ok(rows.len() != before)
    }
}

#[async_trait]
impl CollectionRemote<Project> for ScriptedRemote {
    async fn get_all(&self) -> RemoteResult<Vec<Project>> {
        self.wait_for_release().await;
        self.get_all_in(&self.projects)
    }

    async fn add(&self, draft: &<Project as Resource>::Draft) -> RemoteResult<Project> {
        self.add_in(&self.projects, draft)
    }

    async fn update(
        &self,
        id: &ResourceId,
        patch: &<Project as Resource>::Patch,
    ) -> RemoteResult<Project> {
        self.update_in(&self.projects, id, patch)
    }

    async fn delete(&self, id: &ResourceId) -> RemoteResult<bool> {
        self.delete_in(&self.projects, id)
    }
}

#[async_trait]
impl CollectionRemote<Certificate> for ScriptedRemote {
    async fn get_all(&self) -> RemoteResult<Vec<Certificate>> {
        self.wait_for_release().await;
        self.get_all_in(&self.certificates)
    }

    async fn add(&self, draft: &<Certificate as Resource>::Draft) -> RemoteResult<Certificate> {
        self.add_in(&self.certificates, draft)
    }

    async fn update(
        &self,
        id: &ResourceId,
        patch: &<Certificate as Resource>::Patch,
    ) -> RemoteResult<Certificate> {
        self.update_in(&self.certificates, id, patch)
    }

    async fn delete(&self, id: &ResourceId) -> RemoteResult<bool> {
        self.delete_in(&self.certificates, id)
    }
}

#[async_trait]
impl ProfileRemote for ScriptedRemote {
    async fn get_profile(&self) -> RemoteResult<Option<Profile>> {
        self.check()?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(&self, patch: &ProfilePatch) -> RemoteResult<Profile> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut slot = self.profile.lock().unwrap();
        let profile = slot.get_or_insert_with(Profile::builtin);
        profile.apply_patch(patch);
        Ok(profile.clone())
    }

    async fn replace_profile(&self, profile: &Profile) -> RemoteResult<Profile> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        *self.profile.lock().unwrap() = Some(profile.clone());
        Ok(profile.clone())
    }
}

#[async_trait]
impl AssetStore for ScriptedRemote {
    async fn upload_asset(&self, kind: ResourceKind, upload: &AssetUpload) -> RemoteResult<String> {
        self.check()?;
        let url = format!(
            "https://cdn.test/{}/{}",
            kind.asset_bucket(),
            upload.file_name
        );
        self.uploads.lock().unwrap().push((kind, url.clone()));
        Ok(url)
    }
}

pub fn memory_store() -> Arc<MemoryFallbackStore> {
    Arc::new(MemoryFallbackStore::new())
}

pub fn as_store(store: &Arc<MemoryFallbackStore>) -> Arc<dyn FallbackStore> {
    store.clone()
}

pub fn ids<R: Resource>(items: &[R]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

pub fn titles<R: Resource>(items: &[R]) -> Vec<String> {
    items.iter().map(|item| item.title().to_string()).collect()
}
