//! Bounded conversation history.
//!
//! Snapshots of past conversations, most-recent first. The store owns deep
//! copies only; nothing here aliases the live conversation.

use chrono::Utc;

use crate::types::{Conversation, ConversationId, HistoryEntry};

/// Maximum number of history entries retained.
pub const MAX_ENTRIES: usize = 10;

/// Most-recent-first store of conversation snapshots.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a store from persisted entries (most-recent first).
    ///
    /// Anything beyond the retention cap is dropped.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    /// Snapshot a conversation into the store.
    ///
    /// Empty conversations are never stored. Re-saving an id replaces the
    /// old entry and moves it to the front. Returns whether a snapshot was
    /// taken.
    pub fn save(&mut self, conversation: &Conversation) -> bool {
        if conversation.is_empty() {
            return false;
        }

        let entry = HistoryEntry::snapshot(conversation, Utc::now());
        self.entries.retain(|e| e.id != entry.id);
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);

        tracing::debug!(
            id = %conversation.id,
            messages = conversation.stats.sent,
            retained = self.entries.len(),
            "Conversation snapshotted into history"
        );
        true
    }

    /// All entries, most-recent first.
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Look up an entry by conversation id.
    pub fn get(&self, id: ConversationId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
