use serde::{Deserialize, Serialize};

use super::{ProjectId, Status};

pub type TaskId = i64;

/// Task as returned by the board API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(rename = "projectId")]
    pub project_id: ProjectId,
    pub name: String,
    pub performer: String,
    pub status: Status,
    pub deadline: String,
}

/// Write model for task creation and partial updates.
///
/// Absent fields are left out of the request body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(
        rename = "projectId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

/// Server-side filters for `GET /projects/{projectId}/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub performer: Option<String>,
    pub status: Option<Status>,
}

impl TaskFilters {
    /// Query parameters to send; empty values are left out.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(performer) = self.performer.as_deref().filter(|p| !p.is_empty()) {
            params.push(("performer", performer.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        params
    }
}
