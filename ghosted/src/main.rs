//! ghosted - chat with someone who will never text back
//!
//! Terminal UI for the authentic ghosting experience: every message is
//! delivered, read, and never answered.

mod app;
mod archives;
mod sink;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ghosted_core::{storage, Config, Engine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;

#[derive(Parser)]
#[command(name = "ghosted")]
#[command(about = "Chat with someone who will never text back")]
#[command(version)]
struct Args {
    /// Config file path (defaults to the XDG location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the simulation for reproducible delays
    #[arg(long)]
    seed: Option<u64>,

    /// Do not persist conversation history
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path).context("failed to load configuration")?,
        None => Config::load().context("failed to load configuration")?,
    };

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        ghosted_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("ghosted TUI starting up");

    // Build the engine; seeding makes delays and trials reproducible
    let now = Instant::now();
    let mut engine = match args.seed {
        Some(seed) => Engine::with_rng(config.engine, now, StdRng::seed_from_u64(seed)),
        None => Engine::new(config.engine, now),
    };

    // Load persisted history; a missing or unreadable file starts fresh
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

    let mut app = App::new(engine);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &history_path, args.no_save);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    // A quit right after an autosave can leave the flag set
    if app.history_dirty && !args.no_save {
        if let Err(e) = storage::save_history(&history_path, app.engine.history().list()) {
            tracing::warn!(error = %e, "Failed to save history on exit");
        }
    }

    print_exit_flourish(&app);

    tracing::info!("ghosted TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    history_path: &Path,
    no_save: bool,
) -> Result<()> {
    loop {
        let now = Instant::now();

        // Let due engine timers fire before drawing
        app.engine.tick(now, &mut app.sink);
        app.drain_sink(now);

        // Apply buffered effects the frame cannot draw
        if let Some(title) = app.pending_title.take() {
            if let Err(e) = execute!(io::stdout(), SetTitle(title.as_str())) {
                tracing::warn!(error = %e, "Failed to set terminal title");
            }
        }
        if app.history_dirty {
            app.history_dirty = false;
            if !no_save {
                if let Err(e) = storage::save_history(history_path, app.engine.history().list()) {
                    tracing::warn!(error = %e, "Failed to save history");
                }
            }
        }

        // Update animations
        app.tick_animation(now);

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key, Instant::now());
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// A parting gift, printed after the terminal is restored.
fn print_exit_flourish(app: &App) {
    let stats = app.engine.stats();

    println!();
    println!("    ╔══════════════════════════════════════╗");
    println!("    ║           🖤 GHOSTED 🤍              ║");
    println!("    ║                                      ║");
    println!("    ║     Where hopes go to die! 💔        ║");
    println!("    ║                                      ║");
    println!("    ║   Messages sent: {:<20}║", stats.sent);
    println!("    ║   Replies received: {:<17}║", stats.replies_received);
    println!(
        "    ║   Self-respect: {:<21}║",
        app.engine.self_respect_level()
    );
    println!("    ║                                      ║");
    println!("    ╚══════════════════════════════════════╝");
    println!();
    println!("💡 Pro tip: Maybe try calling instead? (Just kidding, they won't answer that either)");
}
