//! Bridges engine display callbacks into TUI state.
//!
//! The chat view redraws from engine state every frame, so message and
//! status callbacks only leave a trace in the log. Effects the frame loop
//! cannot derive from state are buffered here and drained once per
//! iteration: encouragement toasts, terminal title changes, and the
//! history-changed flag that drives saving.

use ghosted_core::{DeliveryStatus, HistoryEntry, Message, MessageId, Renderer};

/// Buffered display effects, drained by the main loop.
#[derive(Default)]
pub struct UiSink {
    /// Encouragements waiting to be shown as toasts
    pub toasts: Vec<String>,
    /// Pending terminal title change
    pub title: Option<String>,
    /// Set when the history list changed since the last drain
    pub history_dirty: bool,
}

impl UiSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for UiSink {
    fn render_message(&mut self, message: &Message) {
        tracing::debug!(message = %message.id, "Message appended to chat view");
    }

    fn update_message_status(&mut self, id: MessageId, status: DeliveryStatus) {
        tracing::debug!(message = %id, status = %status, "Receipt label updated");
    }

    fn set_ambient_status(&mut self, status: &str) {
        tracing::debug!(status, "Ambient status line updated");
    }

    fn show_notification(&mut self, text: &str) {
        self.toasts.push(text.to_string());
    }

    fn set_page_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn render_history_list(&mut self, entries: &[HistoryEntry]) {
        tracing::debug!(entries = entries.len(), "History list changed");
        self.history_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_buffers_effects_for_the_frame_loop() {
        let mut sink = UiSink::new();
        sink.show_notification("first");
        sink.show_notification("second");
        sink.set_page_title("Ghosted - Still No Reply 😢");
        sink.render_history_list(&[]);

        assert_eq!(sink.toasts, vec!["first", "second"]);
        assert_eq!(sink.title.as_deref(), Some("Ghosted - Still No Reply 😢"));
        assert!(sink.history_dirty);
    }
}
