//! Pure view functions for the event manager.
//!
//! Everything here takes `&AppState` and draws to a ratatui `Frame`.
//! Nothing mutates state or returns effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::text::{display_width, tail_to_width, truncate_with_ellipsis};
use crate::state::{AppState, Screen, Toast, ToastKind};

const TITLE: &str = "Event Manager";

/// Height of the bordered add input.
const INPUT_HEIGHT: u16 = 3;

/// Width of the selection marker in front of each row.
const MARKER_WIDTH: usize = 2;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Renders the whole screen.
pub fn render(app: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    render_add_input(app, frame, chunks[1]);
    render_event_list(app, frame, chunks[2]);
    render_toast(app.toast.as_ref(), frame, chunks[3]);
    render_hints(app, frame, chunks[4]);
}

fn render_header(app: &AppState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if app.in_flight > 0 {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        spans.push(Span::raw(" "));
        spans.push(Span::styled(spinner, Style::default().fg(Color::Yellow)));
    }

    let used = display_width(TITLE) + 5;
    let room = usize::from(area.width).saturating_sub(used);
    if room > 0 {
        spans.push(Span::styled(
            format!("  {}", truncate_with_ellipsis(&app.endpoint, room)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_add_input(app: &AppState, frame: &mut Frame, area: Rect) {
    let focused = app.editing().is_none();
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Add new event ");
    let inner = block.inner(area);

    // Leave one column for the cursor.
    let visible = tail_to_width(&app.new_event, usize::from(inner.width).saturating_sub(1));
    let line = if app.new_event.is_empty() && focused {
        Line::from(Span::styled(
            "Type a name and press Enter",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(visible)
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if focused && inner.height > 0 {
        let x = inner.x + to_u16(display_width(visible));
        frame.set_cursor_position((x, inner.y));
    }
}

fn render_event_list(app: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Events ({}) ", app.events.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.is_loading() {
        let line = Line::from(Span::styled(
            "Loading…",
            Style::default().fg(Color::Yellow),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }
    if app.events.is_empty() {
        let line = Line::from(Span::styled(
            "No events yet.",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let height = usize::from(inner.height);
    if height == 0 {
        return;
    }
    let offset = app.selected.saturating_sub(height - 1);
    let name_width = usize::from(inner.width).saturating_sub(MARKER_WIDTH);
    let draft = app.editing();

    let mut lines = Vec::with_capacity(height);
    for (idx, event) in app.events.iter().enumerate().skip(offset).take(height) {
        let selected = idx == app.selected;
        let marker = if selected { "> " } else { "  " };

        let line = match draft {
            Some(draft) if draft.id == event.id => {
                let shown = tail_to_width(&draft.name, name_width.saturating_sub(1));
                let row = inner.y + to_u16(idx - offset);
                let x = inner.x + to_u16(MARKER_WIDTH + display_width(shown));
                frame.set_cursor_position((x, row));
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                    Span::styled(
                        shown.to_string(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                ])
            }
            _ => {
                let style = if selected {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(truncate_with_ellipsis(&event.name, name_width), style),
                ])
            }
        };
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Info => Color::Cyan,
        ToastKind::Removed => Color::Magenta,
        ToastKind::Error => Color::Red,
    }
}

fn render_toast(toast: Option<&Toast>, frame: &mut Frame, area: Rect) {
    let Some(toast) = toast else {
        return;
    };
    let color = toast_color(toast.kind);
    let mut spans = vec![Span::styled(
        toast.title.clone(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if !toast.description.is_empty() {
        let room = usize::from(area.width).saturating_sub(display_width(&toast.title) + 1);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            truncate_with_ellipsis(&toast.description, room),
            Style::default().fg(color),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_hints(app: &AppState, frame: &mut Frame, area: Rect) {
    let hints: &[(&str, &str)] = match app.screen {
        Screen::Editing(_) => &[("Enter", "save"), ("Esc", "cancel"), ("Ctrl+C", "quit")],
        _ => &[
            ("Enter", "add"),
            ("↑↓", "select"),
            ("Ctrl+E", "edit"),
            ("Ctrl+D", "delete"),
            ("Ctrl+R", "reload"),
            ("Esc", "quit"),
        ],
    };

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {label}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
