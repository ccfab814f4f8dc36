//! Renderer trait abstraction
//!
//! The engine never touches a screen. Everything visible flows through the
//! [`Renderer`] capability the host passes into each mutating call:
//! "render a message", "update a status label", "show a notification".
//!
//! ## Design Principles
//!
//! 1. **State is the source of truth**: hosts may redraw entirely from the
//!    engine's accessors and treat these callbacks as logging hooks
//! 2. **Event-shaped surfaces stay callbacks**: notifications, title
//!    changes, and history-list changes have no state to poll, so hosts
//!    that want them must observe them here
//! 3. **No return values**: rendering can never fail the engine

use crate::types::{DeliveryStatus, HistoryEntry, Message, MessageId};

/// Capabilities the engine invokes on its host.
///
/// Every method has a no-op default, so a host only overrides the surfaces
/// it actually presents.
pub trait Renderer {
    /// A new message was appended to the current conversation.
    fn render_message(&mut self, _message: &Message) {}

    /// A message's receipt status changed.
    fn update_message_status(&mut self, _id: MessageId, _status: DeliveryStatus) {}

    /// The ambient presence status changed.
    fn set_ambient_status(&mut self, _status: &str) {}

    /// An encouragement (or other transient notice) should be shown.
    fn show_notification(&mut self, _text: &str) {}

    /// A milestone changed the page title.
    fn set_page_title(&mut self, _title: &str) {}

    /// The history list changed; `entries` is most-recent first.
    fn render_history_list(&mut self, _entries: &[HistoryEntry]) {}
}

/// Renderer that does nothing. Useful for headless operation and tests
/// that only inspect engine state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}
