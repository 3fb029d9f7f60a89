//! Project resource endpoints, mounted at `/projects`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Duration;
use serde_json::{Map, Value};
use taskboard_types::{timestamp, NewProject, Project, ProjectPatch};
use tracing::info;
use utoipa::OpenApi;

use crate::error::{route_not_found, JsonBody, PathParam, ServerError};
use crate::state::AppState;

/// A project without an explicit end date runs this long.
const DEFAULT_PROJECT_DAYS: i64 = 30;

#[derive(OpenApi)]
#[openapi(
    paths(list_projects, get_project, create_project, update_project, delete_project),
    components(schemas(NewProject, ProjectPatch))
)]
pub struct ProjectsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_projects).post(create_project).fallback(route_not_found))
        .route(
            "/{id}",
            get(get_project)
                .put(update_project)
                .delete(delete_project)
                .fallback(route_not_found),
        )
}

#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    responses(
        (status = 200, description = "All projects in insertion order", body = Value),
    )
)]
pub async fn list_projects(State(state): State<Arc<AppState>>) -> Json<Vec<Project>> {
    Json(state.store.projects.list().await)
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "projects",
    params(
        ("id" = String, Path, description = "ID of the project to retrieve")
    ),
    responses(
        (status = 200, description = "Project retrieved", body = Value),
        (status = 404, description = "Project not found"),
    )
)]
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Project>, ServerError> {
    Ok(Json(state.store.projects.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created", body = Value),
        (status = 400, description = "Name missing or body malformed"),
    )
)]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    JsonBody(draft): JsonBody<NewProject>,
) -> Result<(StatusCode, Json<Project>), ServerError> {
    let name = draft
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Project name is required".to_owned()))?;

    let project = state
        .store
        .projects
        .insert_with(|id, now| Project {
            id,
            name,
            description: draft.description.unwrap_or_default(),
            start_date: draft
                .start_date
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| timestamp::format(&now)),
            end_date: draft
                .end_date
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| timestamp::format(&(now + Duration::days(DEFAULT_PROJECT_DAYS)))),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        })
        .await;

    info!(project_id = %project.id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "projects",
    params(
        ("id" = String, Path, description = "ID of the project to update")
    ),
    request_body = ProjectPatch,
    responses(
        (status = 200, description = "Merged project", body = Value),
        (status = 400, description = "Body is not an object or the merge is invalid"),
        (status = 404, description = "Project not found"),
    )
)]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Project>, ServerError> {
    // A missing record wins over a bad body.
    state.store.projects.require(&id).await?;
    let patch = super::object_body(&body?)?;
    let project = state.store.projects.update(&id, &patch).await?;
    info!(project_id = %id, "project updated");
    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "projects",
    params(
        ("id" = String, Path, description = "ID of the project to delete")
    ),
    responses(
        (status = 200, description = "The removed project", body = Value),
        (status = 404, description = "Project not found"),
    )
)]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Project>, ServerError> {
    let project = state.store.projects.remove(&id).await?;
    info!(project_id = %id, "project deleted");
    Ok(Json(project))
}
