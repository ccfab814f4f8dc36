//! ghosted-simulate - headless run of the ghosting engine
//!
//! Sends a batch of messages into the engine on a stepped clock and narrates
//! the receipt lifecycle as it unfolds, then prints a summary. Useful for
//! watching the engine without a terminal UI, and for scripting.
//!
//! Uses XDG Base Directory specification for file locations:
//! - History: $XDG_DATA_HOME/ghosted/history.json (~/.local/share/ghosted/history.json)
//! - Logs: $XDG_STATE_HOME/ghosted/ghosted.log (~/.local/state/ghosted/ghosted.log)
//! - Config: $XDG_CONFIG_HOME/ghosted/config.toml (~/.config/ghosted/config.toml)

mod archives;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use ghosted_core::types::{DeliveryStatus, HistoryEntry, Message, MessageId};
use ghosted_core::{storage, Config, Engine, Renderer};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::archives::ArchiveKind;

/// Clock granularity for the stepped simulation.
const STEP: Duration = Duration::from_millis(100);

/// Pause between sends, long enough for most receipts to land in between.
const GAP_MS: u64 = 1_500;

/// Tail run after the last send so every pending timer fires.
const SETTLE_MS: u64 = 13_000;

/// Sample one-sided conversation, cycled when --messages exceeds it.
const SAMPLE_MESSAGES: [&str; 12] = [
    "Hey! How's it going?",
    "Did you see my last message?",
    "I was just thinking about you",
    "That song came on again today",
    "So anyway...",
    "You there?",
    "I guess you're busy",
    "No worries, whenever you're free",
    "Okay just one more message",
    "I promise this is the last one",
    "Miss you",
    "Hello?",
];

#[derive(Parser)]
#[command(name = "ghosted-simulate")]
#[command(about = "Run the ghosting engine headlessly and print what happens")]
#[command(version)]
struct Args {
    /// How many messages to send before giving up
    #[arg(long, default_value = "12")]
    messages: u32,

    /// Message text to send, repeatable; cycled in place of the samples
    #[arg(long)]
    text: Vec<String>,

    /// Seed the simulation for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Print a JSON summary instead of a transcript
    #[arg(long)]
    json: bool,

    /// Print a canned archive instead of simulating
    /// (previous, ignored, silence, hopeless)
    #[arg(long)]
    replay: Option<String>,

    /// Do not persist conversation history
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        ghosted_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(messages = args.messages, "ghosted-simulate starting");

    if let Some(key) = &args.replay {
        return replay_archive(key);
    }

    run_simulation(&config, &args)
}

/// Print one canned archive transcript and exit.
fn replay_archive(key: &str) -> Result<()> {
    let Some(kind) = ArchiveKind::from_key(key) else {
        let known: Vec<&str> = archives::ARCHIVES.iter().map(|a| a.kind.key()).collect();
        anyhow::bail!("unknown archive '{}' (known: {})", key, known.join(", "));
    };
    let archive = archives::archive(kind);

    println!("{}", archive.title);
    println!("{}", archive.subtitle);
    println!();
    for line in &archive.messages {
        let receipt = if line.read {
            "✓✓ Read (but ignored)"
        } else {
            "Sent"
        };
        println!("  You  {}", line.text);
        println!("       {}  {}", line.age, receipt);
    }

    tracing::info!(archive = kind.key(), "Archive replay printed");
    Ok(())
}

/// Renderer that narrates engine callbacks to stdout.
struct PrintRenderer {
    quiet: bool,
}

impl Renderer for PrintRenderer {
    fn render_message(&mut self, message: &Message) {
        if self.quiet {
            return;
        }
        println!("  you  {}", message.text);
    }

    fn update_message_status(&mut self, id: MessageId, status: DeliveryStatus) {
        if self.quiet {
            return;
        }
        println!("       {} -> {}", id, status.label());
    }

    fn set_ambient_status(&mut self, status: &str) {
        if self.quiet {
            return;
        }
        println!("  [status] {}", status);
    }

    fn show_notification(&mut self, text: &str) {
        if self.quiet {
            return;
        }
        println!("  [toast] {}", text);
    }

    fn set_page_title(&mut self, title: &str) {
        if self.quiet {
            return;
        }
        println!("  [title] {}", title);
    }

    fn render_history_list(&mut self, entries: &[HistoryEntry]) {
        if self.quiet {
            return;
        }
        println!("  [history] {} saved chat(s)", entries.len());
    }
}

fn run_simulation(config: &Config, args: &Args) -> Result<()> {
    let t0 = Instant::now();
    let mut engine = match args.seed {
        Some(seed) => Engine::with_rng(config.engine, t0, StdRng::seed_from_u64(seed)),
        None => Engine::new(config.engine, t0),
    };

    let history_path = config.storage.effective_history_path();
    match storage::load_history(&history_path) {
        Ok(entries) => engine.load_history(entries),
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %history_path.display(),
                "Could not load history, starting fresh"
            );
        }
    }

    let mut renderer = PrintRenderer { quiet: args.json };
    let mut now = t0;

    for i in 0..args.messages as usize {
        let text = if args.text.is_empty() {
            SAMPLE_MESSAGES[i % SAMPLE_MESSAGES.len()]
        } else {
            args.text[i % args.text.len()].as_str()
        };
        engine.send(text, now, &mut renderer);
        now = advance(&mut engine, &mut renderer, now, GAP_MS);
    }

    // Let the last receipts and a stretch of ambient life play out
    advance(&mut engine, &mut renderer, now, SETTLE_MS);

    let stats = engine.stats();

    if args.json {
        let summary = serde_json::json!({
            "messages_sent": stats.sent,
            "messages_read": stats.read,
            "replies_received": stats.replies_received,
            "hope_level": engine.hope_level(),
            "self_respect_level": engine.self_respect_level(),
            "saved_chats": engine.history().len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!("Messages sent: {}", stats.sent);
        println!("Messages read: {}", stats.read);
        println!("Replies received: {}", stats.replies_received);
        println!("Hope level: {}", engine.hope_level());
        println!("Self-respect: {}", engine.self_respect_level());
    }

    // Autosave snapshots land in the store; persist whatever made it there
    if !args.no_save && !engine.history().is_empty() {
        storage::save_history(&history_path, engine.history().list())
            .context("failed to save history")?;
        tracing::info!(path = %history_path.display(), "History saved");
    }

    tracing::info!(
        sent = stats.sent,
        read = stats.read,
        "ghosted-simulate complete"
    );

    Ok(())
}

/// Step the clock forward in small increments so timers fire in order.
fn advance(
    engine: &mut Engine,
    renderer: &mut PrintRenderer,
    mut now: Instant,
    ms: u64,
) -> Instant {
    let end = now + Duration::from_millis(ms);
    while now < end {
        now += STEP;
        engine.tick(now, renderer);
    }
    now
}
