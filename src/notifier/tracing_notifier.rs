use crate::notifier::Notifier;

/// Notifier that emits `tracing` events on the `taskboard::notify` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "taskboard::notify", kind = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "taskboard::notify", kind = "error", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "taskboard::notify", kind = "info", "{}", message);
    }
}
