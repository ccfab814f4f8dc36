//! Core domain types for ghosted
//!
//! These types model one-sided conversations: messages the user sends, the
//! receipt states they move through, and the snapshots retained in history.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Conversation** | One bounded sequence of sent messages plus derived stats |
//! | **Message** | A single sent text with its receipt status |
//! | **HistoryEntry** | An immutable snapshot of a past conversation |
//! | **DeliveryStatus** | Where a message sits in the Sent → Delivered → Read chain |
//!
//! A conversation only ever contains the user's own messages. The other
//! side reads everything and replies to nothing; `replies_received` exists
//! so the zero can be displayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Identifiers
// ============================================

/// Identifier for a message within the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Identifier for a conversation.
///
/// Derived from the creation time (epoch milliseconds), bumped past the
/// previous id when two conversations are created within the same
/// millisecond. Unique for the process lifetime, and in practice across
/// sessions, so history entries keyed by id replace correctly on re-save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

// ============================================
// Delivery Status
// ============================================

/// Receipt state of a sent message.
///
/// Transitions are strictly `Sent -> Delivered -> Read`, driven by the
/// engine's timers. A message never skips Delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
}

impl DeliveryStatus {
    /// Returns the identifier used in persistence
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Read => "read",
        }
    }

    /// Returns the label shown next to a message in the chat widget
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "Sent",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Read => "✓✓ Read",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(DeliveryStatus::Sent),
            "delivered" => Ok(DeliveryStatus::Delivered),
            "read" => Ok(DeliveryStatus::Read),
            _ => Err(format!("unknown delivery status: {}", s)),
        }
    }
}

// ============================================
// Message
// ============================================

/// A single message sent by the user.
///
/// The text is immutable after creation; only the engine mutates `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Process-unique identifier
    pub id: MessageId,
    /// Message body as entered (trimmed)
    pub text: String,
    /// When the message was sent
    pub sent_at: DateTime<Utc>,
    /// Current receipt state
    pub status: DeliveryStatus,
}

// ============================================
// Conversation
// ============================================

/// Counters for the current conversation.
///
/// `replies_received` is a structural constant of zero: no code path
/// increments it. That is the product, not a bug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    /// Messages the user has sent
    pub sent: u64,
    /// Messages that have reached Read
    pub read: u64,
    /// Replies from the other side (always 0)
    pub replies_received: u64,
}

/// The current conversation: ordered messages plus stats.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Unique identifier (creation-derived)
    pub id: ConversationId,
    /// When this conversation started
    pub started_at: DateTime<Utc>,
    /// Messages in send order
    pub messages: Vec<Message>,
    /// Running counters
    pub stats: ConversationStats,
}

impl Conversation {
    /// Create an empty conversation with the given identity.
    pub fn new(id: ConversationId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            started_at,
            messages: Vec::new(),
            stats: ConversationStats::default(),
        }
    }

    /// True if no message has been sent yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Look up a message by id.
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub(crate) fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

// ============================================
// History
// ============================================

/// A snapshotted message inside a history entry.
///
/// Deep copy of the live message at save time; primitive fields only so
/// the history list round-trips through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    /// Message body
    pub text: String,
    /// When the message was sent
    pub sent_at: DateTime<Utc>,
    /// Receipt state at save time
    pub status: DeliveryStatus,
}

impl From<&Message> for MessageSnapshot {
    fn from(m: &Message) -> Self {
        Self {
            text: m.text.clone(),
            sent_at: m.sent_at,
            status: m.status,
        }
    }
}

/// An immutable snapshot of a past conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Id of the snapshotted conversation
    pub id: ConversationId,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
    /// Number of messages sent at save time
    pub message_count: u64,
    /// Snapshotted message views, in send order
    pub messages: Vec<MessageSnapshot>,
    /// Counters at save time
    pub stats: ConversationStats,
}

impl HistoryEntry {
    /// Build a snapshot of a conversation.
    ///
    /// The copy shares nothing with the live conversation; later sends
    /// cannot reach back into history.
    pub fn snapshot(conversation: &Conversation, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: conversation.id,
            saved_at,
            message_count: conversation.stats.sent,
            messages: conversation.messages.iter().map(Into::into).collect(),
            stats: conversation.stats,
        }
    }
}
