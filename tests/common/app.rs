use std::sync::Arc;

use taskboard_client::api::HttpBoardApi;
use taskboard_client::notifier::RecordingNotifier;
use taskboard_client::stores::StoreSettings;
use taskboard_client::Board;

use super::{Factory, MockBoardServer};

/// Board wired to a mock server over real HTTP
pub struct TestBoard {
    pub server: MockBoardServer,
    pub board: Board,
    pub notifier: RecordingNotifier,
}

#[allow(dead_code)]
impl TestBoard {
    /// Board over the sample data from [`Factory`]
    pub async fn new() -> Self {
        Self::with_settings(StoreSettings::default()).await
    }

    pub async fn with_settings(settings: StoreSettings) -> Self {
        let server = MockBoardServer::start(Factory::projects(), Factory::tasks()).await;
        let api = HttpBoardApi::new(server.base_url.as_str()).expect("Failed to create API client");
        let notifier = RecordingNotifier::new();
        let board = Board::new(Arc::new(api), Arc::new(notifier.clone()), settings);

        Self {
            server,
            board,
            notifier,
        }
    }
}
