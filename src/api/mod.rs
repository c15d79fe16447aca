pub mod http;
pub mod memory;

pub use http::HttpBoardApi;
pub use memory::{InMemoryBoardApi, Operation, RecordedRequest};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    Project, ProjectId, ProjectPayload, Task, TaskFilters, TaskId, TaskPayload,
};

/// Result type alias for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Remote board API used by the stores.
///
/// Implementations return the parsed response body, or an [`ApiError`]
/// for transport failures and non-2xx responses.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// `GET /projects/`
    async fn list_projects(&self) -> ApiResult<Vec<Project>>;

    /// `GET /projects/{id}`
    async fn get_project(&self, id: ProjectId) -> ApiResult<Project>;

    /// `POST /projects`
    async fn create_project(&self, payload: &ProjectPayload) -> ApiResult<Project>;

    /// `PUT /projects/{id}`
    async fn update_project(&self, id: ProjectId, payload: &ProjectPayload)
        -> ApiResult<Project>;

    /// `DELETE /projects/{id}`
    async fn delete_project(&self, id: ProjectId) -> ApiResult<()>;

    /// `GET /projects/{projectId}/tasks` with filters as query parameters
    async fn list_tasks(&self, project_id: ProjectId, filters: &TaskFilters)
        -> ApiResult<Vec<Task>>;

    /// `GET /projects/{projectId}/tasks/{id}`
    async fn get_task(&self, project_id: ProjectId, id: TaskId) -> ApiResult<Task>;

    /// `POST /projects/{projectId}/tasks`
    async fn create_task(&self, project_id: ProjectId, payload: &TaskPayload)
        -> ApiResult<Task>;

    /// `PUT /projects/{projectId}/tasks/{id}`
    ///
    /// The body is sent as-is; callers build the full record.
    async fn update_task(
        &self,
        project_id: ProjectId,
        id: TaskId,
        record: &serde_json::Value,
    ) -> ApiResult<Task>;
}
