use std::sync::{Arc, Mutex, PoisonError};

use crate::notifier::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Notifier that keeps every notification in emission order.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push(&self, kind: NotificationKind, message: &str) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                kind,
                message: message.to_string(),
            });
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NotificationKind::Error, message);
    }

    fn info(&self, message: &str) {
        self.push(NotificationKind::Info, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order_and_shares_log() {
        let notifier = RecordingNotifier::new();
        let clone = notifier.clone();

        notifier.success("saved");
        clone.error("failed");
        notifier.info("updated");

        let kinds: Vec<_> = notifier.notifications().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Success,
                NotificationKind::Error,
                NotificationKind::Info
            ]
        );

        assert_eq!(clone.drain().len(), 3);
        assert!(notifier.notifications().is_empty());
    }
}
