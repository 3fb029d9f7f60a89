//! Task resource endpoints, mounted at `/tasks`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};
use taskboard_types::{timestamp, NewTask, Priority, Task, TaskPatch, TaskStatus};
use tracing::info;
use utoipa::OpenApi;

use crate::error::{route_not_found, JsonBody, PathParam, ServerError};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, get_task, create_task, update_task, delete_task),
    components(schemas(NewTask, TaskPatch, TaskStatus, Priority))
)]
pub struct TasksApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task).fallback(route_not_found))
        .route(
            "/{id}",
            get(get_task)
                .put(update_task)
                .delete(delete_task)
                .fallback(route_not_found),
        )
}

#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "All tasks in insertion order", body = Value),
    )
)]
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.store.tasks.list().await)
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to retrieve")
    ),
    responses(
        (status = 200, description = "Task retrieved", body = Value),
        (status = 404, description = "Task not found"),
    )
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(state.store.tasks.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = Value),
        (status = 400, description = "Title missing or body malformed"),
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    JsonBody(draft): JsonBody<NewTask>,
) -> Result<(StatusCode, Json<Task>), ServerError> {
    let title = draft
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Title is required".to_owned()))?;

    let task = state
        .store
        .tasks
        .insert_with(|id, now| Task {
            id,
            title,
            description: draft.description.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            due_date: draft
                .due_date
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| timestamp::format(&now)),
            project: draft.project.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        })
        .await;

    info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to update")
    ),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "Merged task", body = Value),
        (status = 400, description = "Body is not an object or the merge is invalid"),
        (status = 404, description = "Task not found"),
    )
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Task>, ServerError> {
    // A missing record wins over a bad body.
    state.store.tasks.require(&id).await?;
    let patch = super::object_body(&body?)?;
    let task = state.store.tasks.update(&id, &patch).await?;
    info!(task_id = %id, "task updated");
    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to delete")
    ),
    responses(
        (status = 200, description = "The removed task", body = Value),
        (status = 404, description = "Task not found"),
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Task>, ServerError> {
    let task = state.store.tasks.remove(&id).await?;
    info!(task_id = %id, "task deleted");
    Ok(Json(task))
}
