//! Application state for the TUI.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ghosted_core::{DeliveryStatus, Engine, HistoryEntry};

use crate::archives::{Archive, ARCHIVES};
use crate::sink::UiSink;

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// How long a replay holds the chat panel before returning.
const REPLAY_WINDOW: Duration = Duration::from_secs(15);

/// Reveal stagger for replayed saved conversations, ms per line.
const SAVED_REVEAL_MS: u64 = 300;

/// Reveal stagger for replayed canned archives, ms per line.
const ARCHIVE_REVEAL_MS: u64 = 500;

/// Sending more than this many messages earns the quit confirmation.
const QUIT_CONFIRM_THRESHOLD: u64 = 5;

/// Current view mode
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ViewMode {
    /// The conversation (default)
    #[default]
    Chat,
    /// History browser over saved conversations and canned archives
    History,
    /// Replaying a past conversation
    Replay,
}

/// An encouragement currently showing as a toast.
pub struct Toast {
    pub text: String,
    shown_at: Instant,
}

/// One revealed line of a replayed conversation.
pub struct ReplayLine {
    pub text: String,
    /// Timestamp or relative-age label
    pub age: String,
    pub read: bool,
}

/// A replay in progress.
pub struct ReplayState {
    pub title: String,
    pub subtitle: String,
    /// Extra banner line, only for saved conversations
    pub extra: Option<String>,
    pub lines: Vec<ReplayLine>,
    /// Lines revealed so far
    pub revealed: usize,
    reveal_every_ms: u64,
    started: Instant,
    ends: Instant,
}

impl ReplayState {
    /// Replay a saved conversation from history.
    fn from_saved(entry: &HistoryEntry, now: Instant) -> Self {
        let lines = entry
            .messages
            .iter()
            .map(|m| ReplayLine {
                text: m.text.clone(),
                age: m.sent_at.with_timezone(&chrono::Local).format("%H:%M").to_string(),
                read: m.status == DeliveryStatus::Read,
            })
            .collect();

        Self {
            title: format!(
                "📚 Chat History: {}",
                entry
                    .saved_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
            ),
            subtitle: format!(
                "Reliving your {} messages of desperation",
                entry.stats.sent
            ),
            extra: Some("All read, none replied. Classic.".to_string()),
            lines,
            revealed: 0,
            reveal_every_ms: SAVED_REVEAL_MS,
            started: now,
            ends: now + REPLAY_WINDOW,
        }
    }

    /// Replay one of the canned archives.
    fn from_archive(archive: &Archive, now: Instant) -> Self {
        let lines = archive
            .messages
            .iter()
            .map(|m| ReplayLine {
                text: m.text.to_string(),
                age: m.age.to_string(),
                read: m.read,
            })
            .collect();

        Self {
            title: archive.title.to_string(),
            subtitle: archive.subtitle.to_string(),
            extra: None,
            lines,
            revealed: 0,
            reveal_every_ms: ARCHIVE_REVEAL_MS,
            started: now,
            ends: now + REPLAY_WINDOW,
        }
    }

    /// Whole seconds until the replay returns to the current chat.
    pub fn seconds_left(&self, now: Instant) -> u64 {
        self.ends.saturating_duration_since(now).as_secs()
    }

    fn advance(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.started).as_millis() as u64;
        let due = (elapsed / self.reveal_every_ms) as usize + 1;
        self.revealed = due.min(self.lines.len());
    }

    fn expired(&self, now: Instant) -> bool {
        now >= self.ends
    }
}

/// Main application state.
pub struct App {
    /// The conversation engine
    pub engine: Engine,
    /// Display-effect buffer handed to every engine call
    pub sink: UiSink,
    /// Current view mode
    pub view_mode: ViewMode,
    /// Message input buffer
    pub input: String,
    /// Selected row in the history browser
    pub history_cursor: usize,
    /// Replay in progress, when in Replay view
    pub replay: Option<ReplayState>,
    /// Active toasts, newest last
    pub toasts: Vec<Toast>,
    /// Terminal title waiting to be applied by the main loop
    pub pending_title: Option<String>,
    /// Set when history changed and should be re-saved
    pub history_dirty: bool,
    /// Quit confirmation modal showing
    pub confirm_quit: bool,
    /// Animation frame counter (increments each render)
    pub animation_frame: u64,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App around an engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            sink: UiSink::new(),
            view_mode: ViewMode::default(),
            input: String::new(),
            history_cursor: 0,
            replay: None,
            toasts: Vec::new(),
            pending_title: None,
            history_dirty: false,
            confirm_quit: false,
            animation_frame: 0,
            should_quit: false,
        }
    }

    /// Rows in the history browser: saved conversations, then archives.
    pub fn history_row_count(&self) -> usize {
        self.engine.history().len() + ARCHIVES.len()
    }

    /// Tick the animation state (call each frame).
    pub fn tick_animation(&mut self, now: Instant) {
        self.animation_frame = self.animation_frame.wrapping_add(1);

        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_DURATION);

        if let Some(replay) = &mut self.replay {
            replay.advance(now);
            if replay.expired(now) {
                self.close_replay();
            }
        }
    }

    /// Move buffered engine effects into view state.
    pub fn drain_sink(&mut self, now: Instant) {
        for text in std::mem::take(&mut self.sink.toasts) {
            self.toasts.push(Toast {
                text: strip_toast_emoji(&text).to_string(),
                shown_at: now,
            });
        }
        if let Some(title) = self.sink.title.take() {
            self.pending_title = Some(title);
        }
        if self.sink.history_dirty {
            self.sink.history_dirty = false;
            self.history_dirty = true;
        }
    }

    // ============================================
    // Key handling
    // ============================================

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if self.confirm_quit {
            self.handle_confirm_key(key);
            return;
        }
        match self.view_mode {
            ViewMode::Chat => self.handle_chat_key(key, now),
            ViewMode::History => self.handle_history_key(key, now),
            ViewMode::Replay => self.handle_replay_key(key),
        }
    }

    /// Handle keyboard input in the chat view.
    fn handle_chat_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => self.start_new_chat(),
                KeyCode::Char('c') | KeyCode::Char('q') => self.request_quit(),
                // Ctrl+Enter sends too, for power users
                KeyCode::Enter => self.send_input(now),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter => self.send_input(now),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Tab => {
                self.view_mode = ViewMode::History;
                self.clamp_history_cursor();
            }
            KeyCode::Esc => self.request_quit(),
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Handle keyboard input in the history browser.
    fn handle_history_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Tab => {
                self.view_mode = ViewMode::Chat;
            }
            KeyCode::Enter => self.open_selected_replay(now),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.history_cursor + 1 < self.history_row_count() {
                    self.history_cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.history_cursor = self.history_cursor.saturating_sub(1);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.history_cursor = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.history_cursor = self.history_row_count().saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Any key abandons a replay early.
    fn handle_replay_key(&mut self, _key: KeyEvent) {
        self.close_replay();
    }

    /// Handle the quit confirmation modal.
    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_quit = false;
            }
            _ => {}
        }
    }

    // ============================================
    // Actions
    // ============================================

    fn send_input(&mut self, now: Instant) {
        let text = std::mem::take(&mut self.input);
        self.engine.send(&text, now, &mut self.sink);
        self.drain_sink(now);
    }

    fn start_new_chat(&mut self) {
        self.engine.start_new(&mut self.sink);
        self.history_cursor = 0;
        self.view_mode = ViewMode::Chat;
    }

    /// Quit immediately, unless enough desperation has accumulated to
    /// warrant asking first.
    fn request_quit(&mut self) {
        if self.engine.stats().sent > QUIT_CONFIRM_THRESHOLD {
            self.confirm_quit = true;
        } else {
            self.should_quit = true;
        }
    }

    fn open_selected_replay(&mut self, now: Instant) {
        self.clamp_history_cursor();
        let saved = self.engine.history().len();

        let replay = if self.history_cursor < saved {
            let entry = &self.engine.history().list()[self.history_cursor];
            tracing::info!(conversation = %entry.id, "Replaying saved conversation");
            ReplayState::from_saved(entry, now)
        } else {
            let archive = &ARCHIVES[self.history_cursor - saved];
            tracing::info!(archive = archive.kind.key(), "Replaying canned archive");
            ReplayState::from_archive(archive, now)
        };

        self.replay = Some(replay);
        self.view_mode = ViewMode::Replay;
    }

    fn close_replay(&mut self) {
        self.replay = None;
        self.view_mode = ViewMode::Chat;
    }

    /// Autosaves can grow the list underneath the cursor.
    fn clamp_history_cursor(&mut self) {
        let last = self.history_row_count().saturating_sub(1);
        if self.history_cursor > last {
            self.history_cursor = last;
        }
    }
}

/// Drop the leading catalog emoji from a toast body; the toast header
/// carries its own.
fn strip_toast_emoji(text: &str) -> &str {
    const LEADING: [&str; 12] = [
        "💡", "🤔", "📖", "🎭", "🔋", "🌟", "😅", "💪", "🎯", "🧠", "💔", "🤡",
    ];
    for emoji in LEADING {
        if let Some(rest) = text.strip_prefix(emoji) {
            return rest.trim_start();
        }
    }
    text
}
