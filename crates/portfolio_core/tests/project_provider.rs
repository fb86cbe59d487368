mod common;

use common::{as_store, ids, memory_store, titles, ScriptedRemote};
use portfolio_core::model::defaults::default_projects;
use portfolio_core::store::{read_json, write_json, PROJECTS_KEY};
use portfolio_core::{
    AssetUpload, ErrorKind, FallbackStore, LoadSource, Project, ProjectDraft, ProjectPatch,
    ProjectProvider, ProviderError, Resource, ResourceId,
};
use std::sync::atomic::Ordering;

fn project(id: i64, title: &str, featured: bool) -> Project {
    Project {
        id: ResourceId::from(id),
        title: title.to_string(),
        description: format!("{title} description"),
        long_description: None,
        technologies: vec!["Rust".to_string()],
        category: "web".to_string(),
        image: None,
        github_url: None,
        live_url: None,
        featured,
        date: None,
    }
}

fn draft(title: &str) -> ProjectDraft {
    ProjectDraft::new(title, "A project", vec!["Rust", "Tokio"], "backend")
}

#[tokio::test]
async fn load_replaces_collection_with_remote_records_and_mirrors_them() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(2, "Two", false), project(1, "One", true)]);
    let store = memory_store();
    let provider = ProjectProvider::new(remote.clone(), as_store(&store));

    let source = provider.load().await;

    assert_eq!(source, LoadSource::Remote);
    assert_eq!(ids(&provider.items()), vec!["2", "1"]);
    assert!(!provider.is_loading());
    assert!(provider.last_error().is_none());
    let mirrored: Vec<Project> = read_json(&*store, PROJECTS_KEY).unwrap().unwrap();
    assert_eq!(mirrored, provider.items());
}

#[tokio::test]
async fn empty_remote_seeds_defaults_without_writing_back() {
    let remote = ScriptedRemote::new();
    let store = memory_store();
    let provider = ProjectProvider::new(remote.clone(), as_store(&store));

    let source = provider.load().await;

    assert_eq!(source, LoadSource::Defaults);
    assert_eq!(provider.items(), default_projects());
    assert_eq!(remote.adds(), 0);
    assert!(remote.projects.lock().unwrap().is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_load_uses_mirrored_snapshot() {
    let remote = ScriptedRemote::failing();
    let store = memory_store();
    let snapshot = vec![project(9, "Cached", true), project(8, "Older", false)];
    write_json(&*store, PROJECTS_KEY, &snapshot).unwrap();
    let provider = ProjectProvider::new(remote, as_store(&store));

    let source = provider.load().await;

    assert_eq!(source, LoadSource::Snapshot);
    assert_eq!(provider.items(), snapshot);
    assert!(!provider.is_loading());
    assert_eq!(
        provider.last_error().map(|issue| issue.kind),
        Some(ErrorKind::NetworkFailure)
    );
}

#[tokio::test]
async fn failed_load_without_snapshot_falls_back_to_defaults() {
    let provider = ProjectProvider::new(ScriptedRemote::failing(), as_store(&memory_store()));

    let source = provider.load().await;

    assert_eq!(source, LoadSource::Defaults);
    assert_eq!(provider.items(), default_projects());
    assert!(provider.last_error().is_some());
}

#[tokio::test]
async fn corrupt_snapshot_is_ignored() {
    let store = memory_store();
    store.set(PROJECTS_KEY, "{not json").unwrap();
    let provider = ProjectProvider::new(ScriptedRemote::failing(), as_store(&store));

    assert_eq!(provider.load().await, LoadSource::Defaults);
    assert_eq!(provider.items(), default_projects());
}

#[tokio::test]
async fn add_round_trips_user_fields_and_prepends() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "Existing", false)]);
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()));
    provider.load().await;

    let input = draft("New").with_links(Some("https://github.com/x".to_string()), None);
    let created = provider.add(input).await.unwrap();

    assert_eq!(ids(&provider.items())[0], created.id().to_string());
    let fetched = provider.get_by_id(created.id()).unwrap();
    assert_eq!(fetched.title, "New");
    assert_eq!(fetched.description, "A project");
    assert_eq!(fetched.technologies, vec!["Rust", "Tokio"]);
    assert_eq!(fetched.category, "backend");
    assert_eq!(fetched.github_url.as_deref(), Some("https://github.com/x"));
    assert!(!fetched.featured);
}

#[tokio::test]
async fn add_normalizes_delimited_technologies_and_keeps_canonical_lists() {
    let provider = ProjectProvider::new(ScriptedRemote::new(), as_store(&memory_store()));

    let canonical = provider.add(draft("Canonical")).await.unwrap();
    assert_eq!(canonical.technologies, vec!["Rust", "Tokio"]);

    let delimited = provider
        .add(draft("Delimited").with_technologies(" React, Node.js ,,\nSQL "))
        .await
        .unwrap();
    assert_eq!(delimited.technologies, vec!["React", "Node.js", "SQL"]);

    let updated = provider
        .update(canonical.id(), ProjectPatch::default().technologies(vec!["Rust", "Axum"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.technologies, vec!["Rust", "Axum"]);
}

#[tokio::test]
async fn add_rejects_missing_required_fields_before_calling_remote() {
    let remote = ScriptedRemote::new();
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()));

    let err = provider
        .add(ProjectDraft::new("Title", "Desc", Vec::<String>::new(), "web"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Validation(_)));
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert_eq!(remote.adds(), 0);
    assert!(provider.is_empty());
    assert_eq!(
        provider.last_error().map(|issue| issue.kind),
        Some(ErrorKind::ValidationFailure)
    );
}

#[tokio::test]
async fn add_during_outage_keeps_local_record_with_unique_id() {
    let remote = ScriptedRemote::failing();
    let store = memory_store();
    let provider = ProjectProvider::new(remote.clone(), as_store(&store));
    provider.load().await;
    let before = provider.len();

    let first = provider.add(draft("Offline A")).await.unwrap();
    let second = provider.add(draft("Offline B")).await.unwrap();

    assert_ne!(first.id(), second.id());
    assert!(first.id().as_number().is_some());
    assert_eq!(provider.len(), before + 2);
    assert_eq!(provider.items().last().unwrap().title, "Offline B");
    assert_eq!(
        provider.last_error().map(|issue| issue.kind),
        Some(ErrorKind::NetworkFailure)
    );
    let mirrored: Vec<Project> = read_json(&*store, PROJECTS_KEY).unwrap().unwrap();
    assert_eq!(mirrored.len(), before + 2);

    remote.set_failing(false);
    provider.load().await;
    assert!(provider.get_by_id(first.id()).is_none());
}

#[tokio::test]
async fn update_of_unknown_id_is_silent_noop() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "One", false)]);
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()));
    provider.load().await;
    let before = provider.items();

    let outcome = provider
        .update(&ResourceId::from(404), ProjectPatch::default().title("Ghost"))
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert_eq!(provider.items(), before);
    assert!(provider.last_error().is_none());
    assert_eq!(remote.update_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_during_outage_patches_local_record() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "One", false)]);
    let store = memory_store();
    let provider = ProjectProvider::new(remote.clone(), as_store(&store));
    provider.load().await;
    remote.set_failing(true);

    let updated = provider
        .update(&ResourceId::from(1), ProjectPatch::default().title("Renamed"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(provider.get_by_id(&ResourceId::from(1)).unwrap().title, "Renamed");
    assert!(provider.last_error().is_some());
    let mirrored: Vec<Project> = read_json(&*store, PROJECTS_KEY).unwrap().unwrap();
    assert_eq!(mirrored[0].title, "Renamed");
}

#[tokio::test]
async fn update_rejects_blanking_required_field() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "One", false)]);
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()));
    provider.load().await;

    let err = provider
        .update(&ResourceId::from(1), ProjectPatch::default().title("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Validation(_)));
    assert_eq!(provider.get_by_id(&ResourceId::from(1)).unwrap().title, "One");
}

#[tokio::test]
async fn delete_removes_locally_on_success_and_failure() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(2, "Two", false), project(1, "One", false)]);
    let store = memory_store();
    let provider = ProjectProvider::new(remote.clone(), as_store(&store));
    provider.load().await;

    assert!(provider.delete(&ResourceId::from(2)).await);
    assert!(provider.get_by_id(&ResourceId::from(2)).is_none());
    assert!(provider.last_error().is_none());

    remote.set_failing(true);
    assert!(provider.delete(&ResourceId::from(1)).await);
    assert!(provider.get_by_id(&ResourceId::from(1)).is_none());
    assert!(provider.last_error().is_some());
    assert_eq!(remote.projects.lock().unwrap().len(), 1);

    let mirrored: Vec<Project> = read_json(&*store, PROJECTS_KEY).unwrap().unwrap();
    assert!(mirrored.is_empty());
}

#[tokio::test]
async fn delete_of_unknown_id_makes_no_remote_call() {
    let remote = ScriptedRemote::new();
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()));

    assert!(!provider.delete(&ResourceId::from(77)).await);
    assert_eq!(remote.deletes(), 0);
}

#[tokio::test]
async fn toggle_featured_twice_restores_original_value() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "One", true)]);
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()));
    provider.load().await;
    let id = ResourceId::from(1);

    let once = provider.toggle_featured(&id).await.unwrap().unwrap();
    assert!(!once.featured);
    let twice = provider.toggle_featured(&id).await.unwrap().unwrap();
    assert!(twice.featured);
    assert!(provider.get_by_id(&id).unwrap().featured);
}

#[tokio::test]
async fn duplicate_adds_copy_with_new_id() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "Foo", true)]);
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()));
    provider.load().await;
    let before = provider.len();

    let copy = provider
        .duplicate(&ResourceId::from(1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(copy.title, "Foo (Copy)");
    assert_ne!(copy.id(), &ResourceId::from(1));
    assert!(copy.featured);
    assert_eq!(provider.len(), before + 1);
    assert_eq!(remote.adds(), 1);

    let missing = provider.duplicate(&ResourceId::from(999)).await.unwrap();
    assert!(missing.is_none());
    assert_eq!(provider.len(), before + 1);
}

#[tokio::test]
async fn reset_restores_defaults_and_overwrites_mirror_only() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "Remote", false)]);
    let store = memory_store();
    let provider = ProjectProvider::new(remote.clone(), as_store(&store));
    provider.load().await;

    provider.reset_to_defaults();

    assert_eq!(provider.items(), default_projects());
    let mirrored: Vec<Project> = read_json(&*store, PROJECTS_KEY).unwrap().unwrap();
    assert_eq!(mirrored, default_projects());
    assert_eq!(titles(&remote.projects.lock().unwrap()), vec!["Remote"]);
}

#[tokio::test]
async fn duplicate_ids_from_remote_keep_first_occurrence() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![
        project(1, "First", false),
        project(1, "Second", false),
        project(2, "Other", false),
    ]);
    let provider = ProjectProvider::new(remote, as_store(&memory_store()));
    provider.load().await;

    assert_eq!(titles(&provider.items()), vec!["First", "Other"]);
}

#[tokio::test]
async fn subscribers_observe_published_state() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "One", false)]);
    let provider = ProjectProvider::new(remote, as_store(&memory_store()));
    let mut rx = provider.subscribe();

    provider.load().await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!(titles(&state.items), vec!["One"]);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn unmounted_provider_ignores_late_completions() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(1, "One", false)]);
    let release = remote.hold_reads();
    let store = memory_store();
    let provider = ProjectProvider::new(remote, as_store(&store));
    let observer = provider.subscribe();

    let (source, seen_before_release) = tokio::join!(provider.load(), async {
        while !provider.is_loading() {
            tokio::task::yield_now().await;
        }
        provider.unmount();
        let seen = observer.borrow().clone();
        release.notify_one();
        seen
    });

    assert_eq!(source, LoadSource::Remote);
    assert_eq!(*observer.borrow(), seen_before_release);
    assert!(provider.is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn export_then_import_replaces_collection() {
    let remote = ScriptedRemote::new();
    remote.seed_projects(vec![project(2, "Two", false), project(1, "One", true)]);
    let source = ProjectProvider::new(remote, as_store(&memory_store()));
    source.load().await;
    let json = source.export_json().unwrap();

    let target = ProjectProvider::new(ScriptedRemote::failing(), as_store(&memory_store()));
    let count = target.import_json(&json).unwrap();

    assert_eq!(count, 2);
    assert_eq!(target.items(), source.items());
    assert!(matches!(
        target.import_json("[{\"broken\": true}]"),
        Err(ProviderError::InvalidSnapshot(_))
    ));
    assert_eq!(target.len(), 2);
}

#[tokio::test]
async fn upload_asset_returns_public_url_and_surfaces_failure() {
    let remote = ScriptedRemote::new();
    let provider = ProjectProvider::new(remote.clone(), as_store(&memory_store()))
        .with_assets(remote.clone());

    let url = provider
        .upload_asset(AssetUpload::new(
            "shot.png",
            "image/png",
            vec![1, 2, 3],
        ))
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.test/project-images/shot.png");

    remote.set_failing(true);
    let err = provider
        .upload_asset(AssetUpload::new("x.png", "image/png", vec![0]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(provider.last_error().is_some());
}

#[tokio::test]
async fn upload_without_asset_store_records_issue() {
    let provider = ProjectProvider::new(ScriptedRemote::new(), as_store(&memory_store()));

    let err = provider
        .upload_asset(AssetUpload::new("shot.png", "image/png", vec![1]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert_eq!(
        provider.last_error().map(|issue| issue.kind),
        Some(ErrorKind::NetworkFailure)
    );
}
