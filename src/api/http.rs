use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::{ApiResult, BoardApi};
use crate::error::{ApiError, ErrorBody};
use crate::models::{
    Project, ProjectId, ProjectPayload, Task, TaskFilters, TaskId, TaskPayload,
};

/// Board API over HTTP
#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    client: Client,
    base_url: String,
}

impl HttpBoardApi {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "Sending request");
        self.client.request(method, url)
    }

    /// Send and decode a JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = Self::check(request.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turn non-2xx responses into [`ApiError::Status`]
    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::debug!(status = status.as_u16(), message = ?message, "Request rejected");

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.send_json(self.request(Method::GET, "/projects/")).await
    }

    async fn get_project(&self, id: ProjectId) -> ApiResult<Project> {
        self.send_json(self.request(Method::GET, &format!("/projects/{}", id)))
            .await
    }

    async fn create_project(&self, payload: &ProjectPayload) -> ApiResult<Project> {
        self.send_json(self.request(Method::POST, "/projects").json(payload))
            .await
    }

    async fn update_project(
        &self,
        id: ProjectId,
        payload: &ProjectPayload,
    ) -> ApiResult<Project> {
        self.send_json(
            self.request(Method::PUT, &format!("/projects/{}", id))
                .json(payload),
        )
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &format!("/projects/{}", id));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn list_tasks(
        &self,
        project_id: ProjectId,
        filters: &TaskFilters,
    ) -> ApiResult<Vec<Task>> {
        let request = self
            .request(Method::GET, &format!("/projects/{}/tasks", project_id))
            .query(&filters.query_params());
        self.send_json(request).await
    }

    async fn get_task(&self, project_id: ProjectId, id: TaskId) -> ApiResult<Task> {
        self.send_json(self.request(
            Method::GET,
            &format!("/projects/{}/tasks/{}", project_id, id),
        ))
        .await
    }

    async fn create_task(&self, project_id: ProjectId, payload: &TaskPayload) -> ApiResult<Task> {
        self.send_json(
            self.request(Method::POST, &format!("/projects/{}/tasks", project_id))
                .json(payload),
        )
        .await
    }

    async fn update_task(
        &self,
        project_id: ProjectId,
        id: TaskId,
        record: &serde_json::Value,
    ) -> ApiResult<Task> {
        self.send_json(
            self.request(
                Method::PUT,
                &format!("/projects/{}/tasks/{}", project_id, id),
            )
            .json(record),
        )
        .await
    }
}
