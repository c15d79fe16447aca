use std::sync::Arc;

use crate::api::{BoardApi, HttpBoardApi};
use crate::config::Config;
use crate::error::ApiError;
use crate::notifier::Notifier;
use crate::stores::{ProjectsStore, StoreSettings, TasksStore};

/// One application context: a single API client, notifier and store of each kind.
///
/// Cloning shares the same stores.
#[derive(Clone)]
pub struct Board {
    pub projects: Arc<ProjectsStore>,
    pub tasks: Arc<TasksStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl Board {
    /// Build a board talking to the configured HTTP API
    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let api = Arc::new(HttpBoardApi::new(config.api_url.as_str())?);
        tracing::debug!(api_url = %api.base_url(), "Board API client ready");
        Ok(Self::new(api, notifier, config.store_settings))
    }

    /// Build a board over any API implementation
    pub fn new(
        api: Arc<dyn BoardApi>,
        notifier: Arc<dyn Notifier>,
        settings: StoreSettings,
    ) -> Self {
        Self {
            projects: Arc::new(ProjectsStore::with_settings(
                api.clone(),
                notifier.clone(),
                settings,
            )),
            tasks: Arc::new(TasksStore::with_settings(api, notifier.clone(), settings)),
            notifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryBoardApi;
    use crate::models::ProjectPayload;
    use crate::notifier::RecordingNotifier;
    use crate::stores::ProjectFilters;

    #[tokio::test]
    async fn test_clones_share_stores() {
        let api = InMemoryBoardApi::new();
        let board = Board::new(
            Arc::new(api.clone()),
            Arc::new(RecordingNotifier::new()),
            StoreSettings::default(),
        );
        let other = board.clone();

        board
            .projects
            .create(&ProjectPayload {
                name: "Shared".to_string(),
                description: String::new(),
                status: "Done".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(other.projects.snapshot().items.len(), 1);

        other.projects.fetch_all(&ProjectFilters::default()).await.unwrap();
        assert_eq!(board.projects.snapshot().items.len(), 1);
    }
}
