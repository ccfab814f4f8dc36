//! UI rendering for the TUI.

use chrono::Local;
use ghosted_core::catalog::history_emoji;
use ghosted_core::{DeliveryStatus, Message};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ReplayState, ViewMode};
use crate::archives::ARCHIVES;

// ========== Palette ==========
// Muted dating-app dark mode; the only warmth is the crush accent

/// Crush accent (header, read receipts, highlights)
const ACCENT: Color = Color::Rgb(255, 105, 135);
/// Border color for the chat panel
const BORDER_CHAT: Color = Color::Rgb(110, 85, 160);
/// Border color for the sidebar blocks
const BORDER_SIDE: Color = Color::Rgb(70, 70, 90);
/// Border color for the input box
const BORDER_INPUT: Color = Color::Rgb(90, 130, 110);
/// Primary message text
const MSG_TEXT: Color = Color::Rgb(230, 230, 230);
/// Timestamps and meta labels
const META: Color = Color::Rgb(128, 128, 128);
/// Toast and modal border
const BORDER_POPUP: Color = Color::Rgb(200, 160, 60);

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.view_mode {
        ViewMode::Chat => render_chat_view(frame, app),
        ViewMode::History => render_history_view(frame, app),
        ViewMode::Replay => render_replay_view(frame, app),
    }

    // Overlays stack on top of whichever view is showing
    render_toast(frame, app);
    if app.confirm_quit {
        render_quit_modal(frame);
    }
}

/// Render the chat view (default).
fn render_chat_view(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: sidebar, chat panel
    let panes = Layout::horizontal([
        Constraint::Length(34), // Sidebar
        Constraint::Min(40),    // Chat
    ])
    .split(area);

    render_sidebar(frame, app, panes[0], false);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Crush header
        Constraint::Min(5),    // Messages
        Constraint::Length(1), // Typing indicator
        Constraint::Length(3), // Input box
        Constraint::Length(1), // Footer
    ])
    .split(panes[1]);

    render_crush_header(frame, app, chunks[0]);
    render_messages(frame, app, chunks[1]);
    render_typing_indicator(frame, app, chunks[2]);
    render_input_box(frame, app, chunks[3]);
    render_chat_footer(frame, app, chunks[4]);
}

/// Render the history browser view.
fn render_history_view(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let panes = Layout::horizontal([
        Constraint::Length(34), // Sidebar (focused)
        Constraint::Min(40),    // Chat
    ])
    .split(area);

    render_sidebar(frame, app, panes[0], true);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Crush header
        Constraint::Min(5),    // Messages
        Constraint::Length(1), // Typing indicator
        Constraint::Length(3), // Input box
        Constraint::Length(1), // Footer
    ])
    .split(panes[1]);

    render_crush_header(frame, app, chunks[0]);
    render_messages(frame, app, chunks[1]);
    render_typing_indicator(frame, app, chunks[2]);
    render_input_box(frame, app, chunks[3]);
    render_history_footer(frame, chunks[4]);
}

/// Render the replay view (a past conversation holds the chat panel).
fn render_replay_view(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let panes = Layout::horizontal([
        Constraint::Length(34), // Sidebar
        Constraint::Min(40),    // Replay panel
    ])
    .split(area);

    render_sidebar(frame, app, panes[0], false);

    let chunks = Layout::vertical([
        Constraint::Min(5),    // Replayed messages
        Constraint::Length(1), // Footer with countdown
    ])
    .split(panes[1]);

    let now = std::time::Instant::now();
    if let Some(replay) = &app.replay {
        render_replay_panel(frame, replay, chunks[0]);
        render_replay_footer(frame, replay, now, chunks[1]);
    }
}

// ============================================
// Sidebar
// ============================================

/// Render the sidebar: brand, history list, stats.
fn render_sidebar(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Brand
        Constraint::Min(6),    // History list
        Constraint::Length(7), // Stats
    ])
    .split(area);

    render_brand(frame, chunks[0]);
    render_history_list(frame, app, chunks[1], focused);
    render_stats(frame, app, chunks[2]);
}

fn render_brand(frame: &mut Frame, area: Rect) {
    let brand = Paragraph::new(Line::from(vec![
        Span::styled("👻 Ghosted", Style::default().fg(ACCENT).bold()),
        Span::styled("  Ctrl+N starts over", Style::default().fg(META)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_SIDE)),
    );
    frame.render_widget(brand, area);
}

/// Saved conversations first, then the canned archives.
fn render_history_list(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let mut items: Vec<ListItem> = Vec::new();

    for (index, entry) in app.engine.history().list().iter().enumerate() {
        let label = format!(
            "{} {} ({} msgs)",
            history_emoji(index),
            entry
                .saved_at
                .with_timezone(&Local)
                .format("%m-%d %H:%M"),
            entry.message_count
        );
        items.push(ListItem::new(label));
    }
    for archive in &ARCHIVES {
        items.push(ListItem::new(archive.label));
    }

    let border = if focused { ACCENT } else { BORDER_SIDE };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border))
                .title(" Chat History ")
                .title_style(Style::default().fg(border).bold()),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.history_cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.engine.stats();

    let stat_line = |label: &str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<17}", label), Style::default().fg(META)),
            Span::styled(value, Style::default().fg(color)),
        ])
    };

    let lines = vec![
        stat_line("Messages Sent", stats.sent.to_string(), MSG_TEXT),
        stat_line("Messages Read", stats.read.to_string(), MSG_TEXT),
        stat_line("Replies Received", stats.replies_received.to_string(), ACCENT),
        stat_line("Hope Level", app.engine.hope_level().to_string(), Color::Yellow),
        stat_line(
            "Self-Respect",
            app.engine.self_respect_level().to_string(),
            Color::Yellow,
        ),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_SIDE))
            .title(" Your Descent ")
            .title_style(Style::default().fg(BORDER_SIDE).bold()),
    );
    frame.render_widget(paragraph, area);
}

// ============================================
// Chat panel
// ============================================

/// The crush header: name plus the ambient presence status.
fn render_crush_header(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![Line::from(vec![
        Span::styled("Your Crush 💔", Style::default().fg(ACCENT).bold()),
        Span::raw("  "),
        Span::styled(app.engine.ambient_status(), Style::default().fg(META).italic()),
    ])];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_CHAT)),
    );
    frame.render_widget(paragraph, area);
}

/// Render the conversation, or the welcome screen when it is empty.
fn render_messages(frame: &mut Frame, app: &App, area: Rect) {
    if app.engine.conversation().is_empty() {
        render_welcome(frame, area);
        return;
    }

    // Three rows per message; show the tail that fits
    let capacity = (area.height.saturating_sub(2) as usize / 3).max(1);
    let messages = app.engine.conversation().messages.as_slice();
    let tail = &messages[messages.len().saturating_sub(capacity)..];

    let mut lines: Vec<Line> = Vec::new();
    for message in tail {
        lines.push(message_text_line(message));
        lines.push(message_meta_line(message));
        lines.push(Line::raw(""));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_CHAT))
            .title(" Messages ")
            .title_style(Style::default().fg(BORDER_CHAT).bold()),
    );
    frame.render_widget(paragraph, area);
}

fn message_text_line(message: &Message) -> Line<'_> {
    Line::from(vec![
        Span::styled("You  ", Style::default().fg(META)),
        Span::styled(message.text.as_str(), Style::default().fg(MSG_TEXT)),
    ])
}

fn message_meta_line(message: &Message) -> Line<'static> {
    let status_style = match message.status {
        DeliveryStatus::Read => Style::default().fg(ACCENT),
        _ => Style::default().fg(META),
    };
    Line::from(vec![
        Span::raw("     "),
        Span::styled(
            message
                .sent_at
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string(),
            Style::default().fg(META),
        ),
        Span::raw("  "),
        Span::styled(message.status.label().to_string(), status_style),
    ])
}

/// The empty-state welcome screen.
fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CHAT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(4), // Title + subtitle
        Constraint::Min(8),    // Columns
    ])
    .split(inner);

    let header = Paragraph::new(vec![
        Line::raw(""),
        Line::styled("Ghosted", Style::default().fg(ACCENT).bold()),
        Line::styled(
            "Experience the authentic frustration of modern digital relationships",
            Style::default().fg(META),
        ),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    let columns = Layout::horizontal([
        Constraint::Percentage(33),
        Constraint::Percentage(34),
        Constraint::Percentage(33),
    ])
    .split(chunks[1]);

    let column = |title: &'static str, items: [&'static str; 3]| {
        let mut lines = vec![
            Line::styled(title, Style::default().fg(MSG_TEXT).bold()),
            Line::raw(""),
        ];
        for item in items {
            lines.push(Line::styled(item, Style::default().fg(META)));
            lines.push(Line::raw(""));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    };

    frame.render_widget(
        column(
            "Examples",
            [
                "💬 \"Hey! How's your day going?\"",
                "😊 \"Did you see that funny meme I sent?\"",
                "❤️ \"Thinking of you today\"",
            ],
        ),
        columns[0],
    );
    frame.render_widget(
        column(
            "Capabilities",
            [
                "📱 Reads your messages instantly",
                "🚫 Never replies (just like your crush)",
                "😅 Provides authentic ghosting experience",
            ],
        ),
        columns[1],
    );
    frame.render_widget(
        column(
            "Limitations",
            [
                "💔 Cannot provide emotional support",
                "🤡 Will make you question your self-worth",
                "😭 May cause excessive hope and disappointment",
            ],
        ),
        columns[2],
    );
}

/// Animated typing line, blank when the other side is not "typing".
fn render_typing_indicator(frame: &mut Frame, app: &App, area: Rect) {
    if !app.engine.is_typing() {
        return;
    }

    let dots = match (app.animation_frame / 3) % 4 {
        0 => "",
        1 => ".",
        2 => "..",
        _ => "...",
    };
    let line = Line::from(vec![
        Span::styled(" Your Crush is typing", Style::default().fg(ACCENT).italic()),
        Span::styled(dots, Style::default().fg(ACCENT)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input_box(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(app.input.as_str(), Style::default().fg(MSG_TEXT)),
        Span::styled("▌", Style::default().fg(ACCENT)),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_INPUT))
            .title(" Message ")
            .title_style(Style::default().fg(BORDER_INPUT)),
    );
    frame.render_widget(paragraph, area);
}

fn render_chat_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" send  "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" history  "),
        Span::styled("Ctrl+N", Style::default().fg(Color::Yellow)),
        Span::raw(" new chat  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::raw("│ "),
        Span::styled(
            format!("{} sent, 0 replies", app.engine.stats().sent),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

fn render_history_footer(frame: &mut Frame, area: Rect) {
    let footer = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" replay  "),
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(" navigate  "),
        Span::styled("Tab/Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" back to chat"),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

// ============================================
// Replay
// ============================================

fn render_replay_panel(frame: &mut Frame, replay: &ReplayState, area: Rect) {
    let mut lines = vec![
        Line::styled(
            replay.title.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::styled(replay.subtitle.clone(), Style::default().fg(META)),
    ];
    if let Some(extra) = &replay.extra {
        lines.push(Line::styled(extra.clone(), Style::default().fg(META)));
    }
    lines.push(Line::raw(""));

    for line in replay.lines.iter().take(replay.revealed) {
        lines.push(Line::from(vec![
            Span::styled("You  ", Style::default().fg(META)),
            Span::styled(line.text.clone(), Style::default().fg(MSG_TEXT)),
        ]));
        let receipt = if line.read {
            "✓✓ Read (but ignored)"
        } else {
            "Sent"
        };
        lines.push(Line::from(vec![
            Span::raw("     "),
            Span::styled(line.age.clone(), Style::default().fg(META)),
            Span::raw("  "),
            Span::styled(receipt, Style::default().fg(ACCENT)),
        ]));
        lines.push(Line::raw(""));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_CHAT))
            .title(" Reliving the Silence ")
            .title_style(Style::default().fg(BORDER_CHAT).bold()),
    );
    frame.render_widget(paragraph, area);
}

fn render_replay_footer(
    frame: &mut Frame,
    replay: &ReplayState,
    now: std::time::Instant,
    area: Rect,
) {
    let footer = Line::from(vec![
        Span::styled(" any key", Style::default().fg(Color::Yellow)),
        Span::raw(" back  │ "),
        Span::styled(
            format!(
                "Returning to current chat in {}s...",
                replay.seconds_left(now)
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

// ============================================
// Overlays
// ============================================

/// Stack active toasts top-right, oldest first.
fn render_toast(frame: &mut Frame, app: &App) {
    if app.toasts.is_empty() {
        return;
    }

    let area = frame.area();
    let width = 42u16.min(area.width.saturating_sub(4));
    if width < 20 || area.height < 8 {
        return;
    }

    let mut y = 1;
    for toast in &app.toasts {
        if y + 4 > area.height.saturating_sub(1) {
            break;
        }
        let popup = Rect {
            x: area.width - width - 2,
            y,
            width,
            height: 4,
        };

        frame.render_widget(Clear, popup);
        let paragraph = Paragraph::new(vec![Line::styled(
            toast.text.clone(),
            Style::default().fg(MSG_TEXT),
        )])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_POPUP))
                .title(" 💭 Reality Check ")
                .title_style(Style::default().fg(BORDER_POPUP).bold()),
        );
        frame.render_widget(paragraph, popup);
        y += 4;
    }
}

/// The quit confirmation, for users who have invested too much to leave.
fn render_quit_modal(frame: &mut Frame) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::raw(""),
        Line::styled(
            "Are you sure you want to leave?",
            Style::default().fg(MSG_TEXT).bold(),
        ),
        Line::styled(
            "What if they finally reply?! (They won't)",
            Style::default().fg(META),
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Yellow)),
            Span::raw(" leave  "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" keep hoping"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_POPUP))
            .title(" Leaving so soon? ")
            .title_style(Style::default().fg(BORDER_POPUP).bold()),
    );
    frame.render_widget(paragraph, area);
}

/// Center a rect of the given percentage size within `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r)[1];

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical)[1]
}
