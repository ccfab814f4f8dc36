//! Canned archive conversations for the sidebar.
//!
//! Every install ships with four archives of being ignored, so the
//! sidebar never looks like this is the first time. Selecting one replays
//! it the same way a saved conversation replays.

use ghosted_core::catalog::HISTORY_FILLERS;

/// One message inside a canned archive.
pub struct ArchiveMessage {
    /// Message body
    pub text: &'static str,
    /// Relative age label shown instead of a timestamp
    pub age: &'static str,
    /// Whether the message was read (they all were)
    pub read: bool,
}

/// A canned past conversation.
pub struct Archive {
    pub kind: ArchiveKind,
    /// Sidebar row label
    pub label: &'static str,
    /// Replay banner title
    pub title: &'static str,
    /// Replay banner subtitle
    pub subtitle: &'static str,
    pub messages: [ArchiveMessage; 4],
}

/// Which canned archive a sidebar row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Previous,
    Ignored,
    Silence,
    Hopeless,
}

impl ArchiveKind {
    /// Stable key, used on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            ArchiveKind::Previous => "previous",
            ArchiveKind::Ignored => "ignored",
            ArchiveKind::Silence => "silence",
            ArchiveKind::Hopeless => "hopeless",
        }
    }

    /// Resolve a key. Unknown keys resolve to nothing and the caller
    /// carries on.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "previous" => Some(ArchiveKind::Previous),
            "ignored" => Some(ArchiveKind::Ignored),
            "silence" => Some(ArchiveKind::Silence),
            "hopeless" => Some(ArchiveKind::Hopeless),
            _ => None,
        }
    }
}

/// Look up the archive for a kind.
pub fn archive(kind: ArchiveKind) -> &'static Archive {
    match kind {
        ArchiveKind::Previous => &ARCHIVES[0],
        ArchiveKind::Ignored => &ARCHIVES[1],
        ArchiveKind::Silence => &ARCHIVES[2],
        ArchiveKind::Hopeless => &ARCHIVES[3],
    }
}

/// The canned archives, in sidebar order.
pub const ARCHIVES: [Archive; 4] = [
    Archive {
        kind: ArchiveKind::Previous,
        label: HISTORY_FILLERS[0],
        title: "💬 Previous Attempts Archive",
        subtitle: "Your greatest hits of being ignored",
        messages: [
            ArchiveMessage {
                text: "Hey! How's your day going?",
                age: "2 days ago",
                read: true,
            },
            ArchiveMessage {
                text: "Did you see that funny meme I sent?",
                age: "2 days ago",
                read: true,
            },
            ArchiveMessage {
                text: "Just checking if you're okay...",
                age: "2 days ago",
                read: true,
            },
            ArchiveMessage {
                text: "I know you're busy but...",
                age: "2 days ago",
                read: true,
            },
        ],
    },
    Archive {
        kind: ArchiveKind::Ignored,
        label: HISTORY_FILLERS[1],
        title: "😢 Hall of Ignored Messages",
        subtitle: "These messages died for your sins",
        messages: [
            ArchiveMessage {
                text: "Good morning! ☀️",
                age: "1 week ago",
                read: true,
            },
            ArchiveMessage {
                text: "Thinking of you ❤️",
                age: "1 week ago",
                read: true,
            },
            ArchiveMessage {
                text: "Miss talking to you",
                age: "1 week ago",
                read: true,
            },
            ArchiveMessage {
                text: "Are we okay?",
                age: "1 week ago",
                read: true,
            },
        ],
    },
    Archive {
        kind: ArchiveKind::Silence,
        label: HISTORY_FILLERS[2],
        title: "🙄 The Silent Treatment Collection",
        subtitle: "Your monologue continues",
        messages: [
            ArchiveMessage {
                text: "I had the weirdest dream about you",
                age: "3 weeks ago",
                read: true,
            },
            ArchiveMessage {
                text: "This song reminded me of you",
                age: "3 weeks ago",
                read: true,
            },
            ArchiveMessage {
                text: "Can we talk?",
                age: "3 weeks ago",
                read: true,
            },
            ArchiveMessage {
                text: "I'm starting to feel crazy",
                age: "3 weeks ago",
                read: true,
            },
        ],
    },
    Archive {
        kind: ArchiveKind::Hopeless,
        label: HISTORY_FILLERS[3],
        title: "😭 The Desperation Chronicles",
        subtitle: "Rock bottom has a basement",
        messages: [
            ArchiveMessage {
                text: "I know I'm being annoying but...",
                age: "1 month ago",
                read: true,
            },
            ArchiveMessage {
                text: "Please just say something",
                age: "1 month ago",
                read: true,
            },
            ArchiveMessage {
                text: "Even if it's to tell me to stop",
                age: "1 month ago",
                read: true,
            },
            ArchiveMessage {
                text: "I'll wait forever if I have to",
                age: "1 month ago",
                read: true,
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_resolves_to_its_archive() {
        for kind in [
            ArchiveKind::Previous,
            ArchiveKind::Ignored,
            ArchiveKind::Silence,
            ArchiveKind::Hopeless,
        ] {
            assert_eq!(archive(kind).kind, kind);
            assert_eq!(ArchiveKind::from_key(kind.key()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_key_resolves_to_nothing() {
        assert_eq!(ArchiveKind::from_key("regret"), None);
        assert_eq!(ArchiveKind::from_key(""), None);
    }

    #[test]
    fn test_archives_were_all_read_and_never_answered() {
        for archive in &ARCHIVES {
            assert_eq!(archive.messages.len(), 4);
            for message in &archive.messages {
                assert!(message.read, "{:?} contains an unread message", archive.kind);
            }
        }
    }
}
