use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tower_content::{bundled_data_dir, load_registry};
use tower_core::{Authority, ContentRegistry};
use tower_runtime::{FileSaveRepository, Runtime, RuntimeConfig, RuntimeHandle, SaveRepository};

fn content() -> Arc<ContentRegistry> {
    Arc::new(load_registry(bundled_data_dir()).expect("bundled content should load"))
}

async fn runtime_at(dir: &Path) -> Runtime {
    let config = RuntimeConfig {
        save_dir: Some(dir.to_path_buf()),
        event_interval: Duration::ZERO,
        ..RuntimeConfig::default()
    };
    Runtime::builder()
        .config(config)
        .registry(content())
        .build()
        .await
        .expect("runtime should build")
}

async fn issue(handle: &RuntimeHandle, line: &str, authority: Authority) -> Vec<String> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default().to_owned();
    let args = words.map(str::to_owned).collect();
    handle
        .handle("ada", "Ada", command, args, authority)
        .await
        .expect("command should resolve")
}

async fn send(handle: &RuntimeHandle, line: &str) -> Vec<String> {
    issue(handle, line, Authority::User).await
}

/// Start a run for "ada" in `dir` and shut the runtime down.
async fn seed_save(dir: &Path) {
    let runtime = runtime_at(dir).await;
    let handle = runtime.handle();
    send(&handle, "start").await;
    send(&handle, "choose Ember").await;
    runtime.shutdown().await.expect("shutdown should succeed");
}

#[tokio::test]
async fn sessions_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    seed_save(dir.path()).await;

    let saved = FileSaveRepository::new(dir.path())
        .unwrap()
        .load("ada")
        .unwrap()
        .expect("a save should exist");

    let runtime = runtime_at(dir.path()).await;
    let handle = runtime.handle();
    let restored = handle.snapshot("ada").await.unwrap().unwrap();
    assert_eq!(restored, saved);
    assert_eq!(restored.state.name, "wait_for_event");

    assert_eq!(
        send(&handle, "floor").await,
        vec!["You are on floor 1 of 15.".to_owned()]
    );
}

#[tokio::test]
async fn restored_runs_draw_the_same_events() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    seed_save(first.path()).await;
    fs::copy(
        first.path().join("ada.json"),
        second.path().join("ada.json"),
    )
    .unwrap();

    let mut replays = Vec::new();
    for dir in [first.path(), second.path()] {
        let runtime = runtime_at(dir).await;
        let handle = runtime.handle();
        let mut lines = issue(&handle, "generate", Authority::Admin).await;
        lines.extend(send(&handle, "stats").await);
        replays.push(lines);
        runtime.shutdown().await.unwrap();
    }

    assert!(!replays[0].is_empty());
    assert_eq!(replays[0], replays[1]);
}

#[tokio::test]
async fn corrupt_saves_start_a_fresh_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ada.json"), b"{ \"version\": 1, \"player_id\": ").unwrap();

    let runtime = runtime_at(dir.path()).await;
    let handle = runtime.handle();
    assert_eq!(
        send(&handle, "stats").await,
        vec!["You don't have a familiar yet.".to_owned()]
    );

    let repaired = FileSaveRepository::new(dir.path()).unwrap().load("ada").unwrap();
    assert_eq!(repaired.map(|save| save.state.name).as_deref(), Some("start"));
}

#[tokio::test]
async fn saves_naming_unknown_content_are_discarded() {
    let dir = tempfile::tempdir().unwrap();
    seed_save(dir.path()).await;

    let path = dir.path().join("ada.json");
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"species\": \"Ember\""));
    fs::write(&path, text.replace("\"species\": \"Ember\"", "\"species\": \"Missingno\"")).unwrap();

    let runtime = runtime_at(dir.path()).await;
    let handle = runtime.handle();
    assert_eq!(
        send(&handle, "stats").await,
        vec!["You don't have a familiar yet.".to_owned()]
    );
}

#[tokio::test]
async fn removing_a_player_deletes_the_save() {
    let dir = tempfile::tempdir().unwrap();
    seed_save(dir.path()).await;
    assert!(dir.path().join("ada.json").exists());

    let runtime = runtime_at(dir.path()).await;
    let handle = runtime.handle();
    assert!(handle.remove_player("ada").await.unwrap());
    assert!(!dir.path().join("ada.json").exists());
    assert!(!handle.remove_player("ada").await.unwrap());
}

#[tokio::test]
async fn saved_players_are_eligible_for_events_after_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    seed_save(dir.path()).await;

    let runtime = runtime_at(dir.path()).await;
    let handle = runtime.handle();
    let mut events = runtime.subscribe_events();

    assert_eq!(handle.tick().await.unwrap().as_deref(), Some("ada"));
    let event = events.try_recv().expect("the restored player gets the event");
    assert_eq!(event.player_id, "ada");
    assert!(!event.lines.is_empty());
}

#[tokio::test]
async fn unreadable_saves_do_not_block_startup() {
    let dir = tempfile::tempdir().unwrap();
    seed_save(dir.path()).await;
    fs::write(dir.path().join("bo.json"), b"not json").unwrap();

    let runtime = runtime_at(dir.path()).await;
    let handle = runtime.handle();
    assert_eq!(handle.tick().await.unwrap().as_deref(), Some("ada"));
    assert!(handle.snapshot("bo").await.unwrap().is_none());
}
