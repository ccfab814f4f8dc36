//! Hope and self-respect derivations.
//!
//! Both levels are pure functions of the sent-message count; nothing is
//! stored, the label is recomputed on demand. Hope degrades one step every
//! 3 messages, self-respect one step every 2; the asymmetry is deliberate
//! (self-respect goes first).

/// Hope labels, most to least hopeful.
pub const HOPE_LEVELS: [&str; 8] = [
    "Declining",
    "Low",
    "Critical",
    "Non-existent",
    "Delusional",
    "Pathetic",
    "Rock Bottom",
    "Subterranean",
];

/// Self-respect labels, most to least intact.
pub const SELF_RESPECT_LEVELS: [&str; 8] = [
    "Critical",
    "Damaged",
    "Destroyed",
    "What respect?",
    "Negative",
    "Inexistent",
    "Gone",
    "Never had any",
];

/// Index into [`HOPE_LEVELS`] for a given sent count.
pub fn hope_index(sent: u64) -> usize {
    (sent / 3).min(HOPE_LEVELS.len() as u64 - 1) as usize
}

/// Index into [`SELF_RESPECT_LEVELS`] for a given sent count.
pub fn self_respect_index(sent: u64) -> usize {
    (sent / 2).min(SELF_RESPECT_LEVELS.len() as u64 - 1) as usize
}

/// Hope label for a given sent count.
pub fn hope_level(sent: u64) -> &'static str {
    HOPE_LEVELS[hope_index(sent)]
}

/// Self-respect label for a given sent count.
pub fn self_respect_level(sent: u64) -> &'static str {
    SELF_RESPECT_LEVELS[self_respect_index(sent)]
}
