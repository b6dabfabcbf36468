use skyhold_core::NotificationSink;
use skyhold_shared::{Notification, NotificationKind};
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Production sink: every toast becomes a `tracing` event. When forwarding,
/// the toast is also handed to the shell, which prints it on its own writer.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier {
    forward: Option<UnboundedSender<Notification>>,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self { forward: None }
    }

    pub fn forwarding(tx: UnboundedSender<Notification>) -> Self {
        Self { forward: Some(tx) }
    }
}

impl NotificationSink for TracingNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        match kind {
            NotificationKind::Info => info!(kind = "info", title, "{}", message),
            NotificationKind::Error => warn!(kind = "error", title, "{}", message),
        }
        if let Some(tx) = &self.forward {
            // Receiver gone means the shell has exited.
            let _ = tx.send(Notification::new(kind, title, message));
        }
    }
}

/// Keeps every notification in memory for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn count_titled(&self, title: &str) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|n| n.title == title)
            .count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Notification::new(kind, title, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let sink = RecordingNotifier::new();
        sink.notify(NotificationKind::Info, "Seat reserved!", "one");
        sink.notify(NotificationKind::Error, "Reservation expired", "two");

        let all = sink.notifications();
        assert_eq!(all.len(), 2);
        assert_eq!(
            all[1],
            Notification::new(NotificationKind::Error, "Reservation expired", "two")
        );
        assert_eq!(sink.count_titled("Seat reserved!"), 1);
    }

    #[test]
    fn test_tracing_notifier_forwards_to_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = TracingNotifier::forwarding(tx);
        sink.notify(NotificationKind::Info, "Booking confirmed", "Enjoy your flight");

        let forwarded = rx.try_recv().unwrap();
        assert_eq!(forwarded.kind, NotificationKind::Info);
        assert_eq!(forwarded.title, "Booking confirmed");

        drop(rx);
        // A closed channel is ignored.
        sink.notify(NotificationKind::Error, "Late", "nobody listening");
    }
}
