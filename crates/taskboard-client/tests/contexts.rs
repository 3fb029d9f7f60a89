//! Drives the data contexts against a real server bound to an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use taskboard_client::{ApiClient, ClientError, ContextState, ProjectContext, TaskContext};
use taskboard_server::{AppState, Config};
use taskboard_types::{NewProject, NewTask, Priority, Task, TaskPatch, TaskStatus};
use tokio::net::TcpListener;

/// Serve the full router on `127.0.0.1:0` and return a client pointed at it.
async fn spawn_server(seed_data: bool) -> ApiClient {
    let config = Config {
        seed_data,
        ..Config::default()
    };
    let app = taskboard_server::build(Arc::new(AppState::new(config).await));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ApiClient::new(&format!("http://{addr}")).unwrap()
}

/// A base URL nothing is listening on.
async fn dead_address() -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ApiClient::new(&format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn init_loads_the_seeded_collections() {
    let client = spawn_server(true).await;
    let tasks = TaskContext::init(client.clone()).await;
    let projects = ProjectContext::init(client).await;

    assert_eq!(tasks.state(), ContextState::Ready);
    assert!(tasks.error().is_none());
    let ids: Vec<&str> = tasks.items().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["task1", "task2"]);
    assert_eq!(projects.items().len(), 2);
    assert_eq!(projects.find("proj2").unwrap().name, "Code Review System");
}

#[tokio::test]
async fn add_appends_the_server_record() {
    let client = spawn_server(false).await;
    let mut tasks = TaskContext::init(client.clone()).await;
    assert!(tasks.items().is_empty());

    let created = tasks.add(&NewTask::titled("Write release notes")).await.unwrap();
    assert!(created.id.starts_with("task"));
    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(created.priority, Priority::Medium);
    assert_eq!(tasks.items(), [created.clone()]);
    assert!(!tasks.is_loading());

    let on_server: Task = client.get(&created.id).await.unwrap();
    assert_eq!(on_server, created);
}

#[tokio::test]
async fn update_replaces_only_the_matching_entry() {
    let client = spawn_server(true).await;
    let mut tasks = TaskContext::init(client).await;
    let before = tasks.find("task1").unwrap().clone();

    let patch = TaskPatch {
        status: Some(TaskStatus::Completed),
        ..TaskPatch::default()
    };
    let updated = tasks.update("task1", &patch).await.unwrap();

    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, before.title);
    assert!(updated.updated_at > before.updated_at);
    assert_eq!(tasks.items()[0], updated);
    assert_eq!(tasks.items()[1].id, "task2");
    assert_eq!(tasks.items()[1].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn remove_filters_the_entry_out() {
    let client = spawn_server(true).await;
    let mut projects = ProjectContext::init(client.clone()).await;

    let removed = projects.remove("proj1").await.unwrap();
    assert_eq!(removed.id, "proj1");
    assert!(projects.find("proj1").is_none());
    assert_eq!(projects.items().len(), 1);

    let err = client.get::<taskboard_types::Project>("proj1").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.server_message(), Some("Project not found"));
}

#[tokio::test]
async fn validation_failure_surfaces_the_server_message() {
    let client = spawn_server(true).await;
    let mut tasks = TaskContext::init(client).await;

    let err = tasks.add(&NewTask::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, .. }));
    assert_eq!(tasks.error(), Some("Title is required"));
    assert_eq!(tasks.items().len(), 2);

    let err = ProjectContext::new(tasks.client().clone())
        .add(&NewProject::default())
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), Some("Project name is required"));
}

#[tokio::test]
async fn missing_record_errors_leave_the_cache_alone() {
    let client = spawn_server(true).await;
    let mut tasks = TaskContext::init(client).await;
    let snapshot = tasks.items().to_vec();

    let err = tasks.update("unknown-id", &TaskPatch::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(tasks.error(), Some("Task not found"));
    assert_eq!(tasks.items(), snapshot.as_slice());

    tasks.remove("unknown-id").await.unwrap_err();
    assert_eq!(tasks.error(), Some("Task not found"));
}

#[tokio::test]
async fn next_success_clears_the_error() {
    let client = spawn_server(true).await;
    let mut tasks = TaskContext::init(client).await;

    tasks.add(&NewTask::default()).await.unwrap_err();
    assert!(tasks.error().is_some());
    tasks.add(&NewTask::titled("Retry")).await.unwrap();
    assert!(tasks.error().is_none());
}

#[tokio::test]
async fn unreachable_server_uses_fallback_messages() {
    let mut tasks = TaskContext::init(dead_address().await).await;
    assert_eq!(tasks.state(), ContextState::Ready);
    assert!(tasks.items().is_empty());
    assert_eq!(tasks.error(), Some("Failed to fetch tasks"));

    let err = tasks.add(&NewTask::titled("Offline")).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(tasks.error(), Some("Failed to add task"));

    let mut projects = ProjectContext::new(tasks.client().clone());
    projects.remove("proj1").await.unwrap_err();
    assert_eq!(projects.error(), Some("Failed to delete project"));
}

#[tokio::test]
async fn failed_refetch_keeps_the_stale_cache() {
    let config = Config::default();
    let app = taskboard_server::build(Arc::new(AppState::new(config).await));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // No pooled connections, so every request needs the listener.
    let http = reqwest::Client::builder().pool_max_idle_per_host(0).build().unwrap();
    let client = ApiClient::with_client(&format!("http://{addr}"), http).unwrap();

    let mut tasks = TaskContext::init(client).await;
    let cached = tasks.items().to_vec();
    assert_eq!(cached.len(), 2);

    server.abort();
    let _ = server.await;

    tasks.fetch().await;
    assert_eq!(tasks.error(), Some("Failed to fetch tasks"));
    assert_eq!(tasks.items(), cached.as_slice());
    assert_eq!(tasks.state(), ContextState::Ready);
}

#[tokio::test]
async fn cancelled_request_does_not_stay_loading() {
    // Accepts connections but never answers them.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut tasks = TaskContext::new(ApiClient::new(&format!("http://{addr}")).unwrap());
    let timed_out = tokio::time::timeout(Duration::from_millis(200), tasks.fetch()).await;
    assert!(timed_out.is_err());
    assert!(!tasks.is_loading());
    assert!(tasks.items().is_empty());
}

#[tokio::test]
async fn health_reports_collection_sizes() {
    let client = spawn_server(true).await;
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.server, "running");
    assert_eq!(health.data.tasks, 2);
    assert_eq!(health.data.projects, 2);
}
