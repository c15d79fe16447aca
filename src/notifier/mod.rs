pub mod recording;
pub mod tracing_notifier;

pub use recording::{Notification, NotificationKind, RecordingNotifier};
pub use tracing_notifier::TracingNotifier;

/// User-facing transient message channel.
///
/// Calls are fire-and-forget: implementations must return immediately
/// and never fail.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);

    fn info(&self, message: &str);
}
