//! Fixed string catalogs the simulator draws from.
//!
//! Presence statuses, encouragements, and milestone titles are contract
//! data: the engine picks from these lists but never invents new entries.

/// The canonical idle presence status. Status-ticker overrides always
/// revert to this.
pub const IDLE_STATUS: &str = "Online (but ignoring you)";

/// Ephemeral status shown after the typing indicator gives up.
pub const STOPPED_TYPING_STATUS: &str = "Last seen typing...";

/// Presence statuses the status ticker samples from (idle entry included).
pub const PRESENCE_STATUSES: [&str; 7] = [
    "Online (but ignoring you)",
    "Active 2 minutes ago",
    "Active 1 hour ago",
    "Online (probably ignoring everyone)",
    "Active now (reading but not replying)",
    "Last seen recently",
    "Online (definitely saw your message)",
];

/// Encouragements, emitted in order every third sent message until the
/// list runs dry. The cursor never resets within a process.
pub const ENCOURAGEMENTS: [&str; 12] = [
    "💡 Maybe they're just really busy crafting the perfect response...",
    "🤔 Third time's the charm, right? RIGHT?!",
    "📖 At least they're reading your messages! That's... something?",
    "🎭 Perhaps they're playing hard to get?",
    "🔋 Maybe their phone died... for the 15th time today...",
    "🌟 Keep believing in yourself! (But maybe lower your expectations)",
    "😅 Hey, at least you're consistent!",
    "💪 Persistence is key! (Or so they say...)",
    "🎯 You miss 100% of the shots you don't take! (You also miss the ones you do take)",
    "🧠 Einstein said insanity is doing the same thing expecting different results...",
    "💔 Your dedication to futile causes is truly admirable!",
    "🤡 Welcome to the circus! You're the main act!",
];

/// Title string for an exact sent-count milestone, if one exists.
///
/// One-shot by construction: the caller checks on each send, and a count
/// equals a threshold exactly once.
pub fn milestone_title(sent: u64) -> Option<&'static str> {
    match sent {
        10 => Some("Ghosted - Still No Reply 😢"),
        20 => Some("Ghosted - Seriously? 🤡"),
        50 => Some("Ghosted - Get Some Help 💔"),
        _ => None,
    }
}

/// Emoji prefix for the n-th saved history row in the sidebar.
pub fn history_emoji(index: usize) -> &'static str {
    const SAD_EMOJIS: [&str; 4] = ["💬", "😢", "🙄", "😭"];
    SAD_EMOJIS.get(index).copied().unwrap_or("💔")
}

/// Filler titles for empty history slots in the sidebar.
pub const HISTORY_FILLERS: [&str; 4] = [
    "💬 Previous Attempts",
    "😢 More Ignored Messages",
    "🙄 Still No Response",
    "😭 Day 47 of Silence",
];
