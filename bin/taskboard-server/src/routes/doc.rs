use crate::routes::{health, projects, tasks};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "taskboard-server",
    description = "In-memory task and project board API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(tasks::TasksApi::openapi());
    root.merge(projects::ProjectsApi::openapi());
    root
}
