pub mod app;
pub mod factory;
pub mod server;

pub use app::TestBoard;
pub use factory::Factory;
pub use server::MockBoardServer;
