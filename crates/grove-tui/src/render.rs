//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference, draw to a ratatui
//! frame, and never mutate state or return effects. The one exception to
//! "never mutate" is the measured transcript layout, which is written through
//! a `Cell` so the reducer can scroll in line units.

use grove_core::session::{DisplayMode, Role, format_timestamp_relative};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::session_picker::{MAX_VISIBLE_SESSIONS, SessionPickerState};
use crate::state::AppState;
use crate::transcript::TranscriptCell;

/// Height of the session title header.
const HEADER_HEIGHT: u16 = 1;

/// Height of the bordered input box.
const INPUT_HEIGHT: u16 = 3;

/// Height of the hint line below the input.
const STATUS_HEIGHT: u16 = 1;

/// Spinner frames for the pending indicator.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Styles derived from the display-mode flag.
struct Theme {
    text: Style,
    dim: Style,
    user_label: Style,
    assistant_label: Style,
    selected: Style,
}

impl Theme {
    fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Light => Self {
                text: Style::default().fg(Color::Black),
                dim: Style::default().fg(Color::DarkGray),
                user_label: Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                assistant_label: Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
                selected: Style::default().bg(Color::Blue).fg(Color::White),
            },
            DisplayMode::Dark => Self {
                text: Style::default().fg(Color::White),
                dim: Style::default().fg(Color::Gray),
                user_label: Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                assistant_label: Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                selected: Style::default().bg(Color::Cyan).fg(Color::Black),
            },
        }
    }
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let theme = Theme::for_mode(app.tui.display_mode);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_header(app, &theme, frame, chunks[0]);
    render_transcript(app, &theme, frame, chunks[1]);
    render_input(app, &theme, frame, chunks[2]);
    render_status(app, &theme, frame, chunks[3]);

    if let Some(picker) = &app.picker {
        render_picker(picker, &theme, frame, area);
    }
}

fn render_header(app: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let session = app.tui.store.current_session();
    let line = Line::from(vec![
        Span::styled(" Grove ", theme.dim),
        Span::styled(session.title.clone(), theme.text.add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_transcript(app: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let height = area.height as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    if app.tui.transcript.cells().is_empty() {
        lines.push(Line::from(Span::styled(
            "No messages yet. Type below to start the conversation.".to_string(),
            theme.dim,
        )));
    }
    for cell in app.tui.transcript.cells() {
        match cell {
            TranscriptCell::Message(message) => {
                let label_style = match message.role {
                    Role::User => theme.user_label,
                    Role::Assistant => theme.assistant_label,
                };
                lines.push(Line::from(Span::styled(
                    message.role.label().to_string(),
                    label_style,
                )));
                for chunk in wrap_text(&message.content, width) {
                    lines.push(Line::from(Span::styled(chunk, theme.text)));
                }
                lines.push(Line::default());
            }
            TranscriptCell::Pending => {
                let spinner = SPINNER_FRAMES[app.tui.spinner_frame % SPINNER_FRAMES.len()];
                lines.push(Line::from(Span::styled(
                    format!("{spinner} Thinking..."),
                    theme.dim,
                )));
            }
        }
    }

    let total = lines.len();
    app.tui.transcript_view.set((total, height));

    let offset = if app.tui.transcript.is_following() {
        total.saturating_sub(height)
    } else {
        app.tui
            .transcript
            .scroll_offset()
            .min(total.saturating_sub(height))
    };

    let visible: Vec<Line<'static>> = lines.into_iter().skip(offset).take(height).collect();
    let paragraph = Paragraph::new(visible);
    let inner = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };
    frame.render_widget(paragraph, inner);
}

fn render_input(app: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_style(theme.dim);
    let inner = block.inner(area);
    let paragraph = Paragraph::new(app.tui.input.text().to_string())
        .style(theme.text)
        .block(block);
    frame.render_widget(paragraph, area);

    // Place the terminal cursor at the input cursor position, clamped to the
    // inner width.
    if app.picker.is_none() {
        let cursor_x = inner.x + (app.tui.input.cursor() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

fn render_status(app: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let left = if app.tui.coordinator.is_awaiting() {
        "Waiting for reply...".to_string()
    } else {
        "Enter send · Ctrl+N new · Ctrl+P sessions · Ctrl+T theme · Esc quit".to_string()
    };
    let right = format!("{} chars", app.tui.input.char_count());

    let pad = (area.width as usize)
        .saturating_sub(left.chars().count() + right.chars().count() + 2);
    let line = Line::from(vec![
        Span::styled(format!(" {left}"), theme.dim),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, theme.dim),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_picker(picker: &SessionPickerState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let height = (MAX_VISIBLE_SESSIONS as u16 + 2).min(area.height);
    let width = (area.width * 3 / 4).clamp(20, 70).min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dim)
        .title(" Sessions (Enter select · n new · d delete · Esc close) ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let visible_rows = inner.height as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, summary) in picker
        .sessions
        .iter()
        .enumerate()
        .skip(picker.offset)
        .take(visible_rows)
    {
        let text = format!(
            " {}  {} message{} · {}",
            summary.title,
            summary.message_count,
            if summary.message_count == 1 { "" } else { "s" },
            format_timestamp_relative(summary.updated_at),
        );
        let style = if idx == picker.selected {
            theme.selected
        } else {
            theme.text
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(" No sessions", theme.dim)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Wraps text to a display width, breaking on characters.
///
/// Always yields at least one chunk so empty content still occupies a line.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut count = 0;
        for c in raw_line.chars() {
            if count == width {
                chunks.push(std::mem::take(&mut current));
                count = 0;
            }
            current.push(c);
            count += 1;
        }
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_breaks_at_width() {
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_wrap_text_preserves_newlines() {
        assert_eq!(wrap_text("ab\ncd", 10), vec!["ab", "cd"]);
    }

    #[test]
    fn test_wrap_text_empty_yields_one_line() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
