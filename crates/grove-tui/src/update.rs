//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects. This is the single source of truth for
//! how events modify state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use grove_core::responder::ResponderError;
use grove_core::session::Role;
use tracing::warn;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::session_picker::SessionPickerState;
use crate::state::{AppState, CoordinatorState, TuiState};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => match term_event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.picker.is_some() {
                    handle_picker_key(app, key)
                } else {
                    handle_main_key(app, key)
                }
            }
            _ => vec![],
        },
        UiEvent::ReplyArrived { session_id, result } => {
            handle_reply_arrived(app, &session_id, result)
        }
    }
}

/// Handles a key press in the main (no overlay) view.
fn handle_main_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Enter => submit_input(tui),
        KeyCode::Char('n') if ctrl => {
            tui.store.create_session();
            sync_transcript(tui);
            vec![]
        }
        KeyCode::Char('p') if ctrl => {
            app.picker = Some(SessionPickerState::open(
                tui.store.summaries(),
                tui.store.current_id(),
            ));
            vec![]
        }
        KeyCode::Char('t') if ctrl => {
            tui.display_mode = tui.display_mode.toggle();
            vec![UiEffect::SaveDisplayMode(tui.display_mode)]
        }
        KeyCode::Up => {
            let (total, height) = tui.transcript_view.get();
            tui.transcript.scroll_up(total, height);
            vec![]
        }
        KeyCode::Down => {
            let (total, height) = tui.transcript_view.get();
            tui.transcript.scroll_down(total, height);
            vec![]
        }
        KeyCode::Left => {
            tui.input.move_left();
            vec![]
        }
        KeyCode::Right => {
            tui.input.move_right();
            vec![]
        }
        KeyCode::Home => {
            tui.input.move_home();
            vec![]
        }
        KeyCode::End => {
            tui.input.move_end();
            vec![]
        }
        KeyCode::Backspace => {
            tui.input.backspace();
            vec![]
        }
        KeyCode::Delete => {
            tui.input.delete();
            vec![]
        }
        KeyCode::Char(c) if !ctrl => {
            tui.input.insert_char(c);
            vec![]
        }
        _ => vec![],
    }
}

/// Submits the input buffer as a user message.
///
/// Rejected (no-op) while a request is in flight or when the trimmed buffer
/// is empty; this is what enforces single-flight.
fn submit_input(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.coordinator.is_awaiting() || tui.input.is_blank() {
        return vec![];
    }

    let text = tui.input.take();
    let session_id = tui.store.current_id().to_string();

    match tui.store.append_message(&session_id, Role::User, &text) {
        Ok(message) => tui.transcript.push_message(message),
        Err(e) => {
            warn!(error = %e, "failed to append user message");
            return vec![];
        }
    }

    tui.transcript.set_pending();
    tui.coordinator = CoordinatorState::AwaitingReply {
        session_id: session_id.clone(),
    };

    vec![UiEffect::AskResponder {
        session_id,
        message: text,
    }]
}

/// Handles the responder result for a request.
///
/// The reply (or failure message) is appended to the session that originated
/// the request. A reply for a deleted session is dropped.
fn handle_reply_arrived(
    app: &mut AppState,
    session_id: &str,
    result: Result<String, ResponderError>,
) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    tui.coordinator = CoordinatorState::Idle;
    tui.transcript.clear_pending();

    if !tui.store.contains(session_id) {
        warn!(session_id, "dropping reply for deleted session");
        return vec![];
    }

    let content = match result {
        Ok(reply) => reply,
        Err(e) => {
            warn!(kind = %e.kind, error = %e, "responder request failed");
            e.transcript_message()
        }
    };

    match tui.store.append_message(session_id, Role::Assistant, content) {
        Ok(message) => {
            if tui.store.current_id() == session_id {
                tui.transcript.push_message(message);
            }
        }
        Err(e) => warn!(error = %e, "failed to append assistant message"),
    }

    // Reply ordering may have changed while the picker is open.
    if let Some(picker) = &mut app.picker {
        picker.refresh(app.tui.store.summaries());
    }

    vec![]
}

/// Handles a key press while the session picker is open.
fn handle_picker_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(picker) = &mut app.picker else {
        return vec![];
    };

    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Esc => {
            app.picker = None;
            vec![]
        }
        KeyCode::Char('p') if ctrl => {
            app.picker = None;
            vec![]
        }
        KeyCode::Up | KeyCode::Char('k') => {
            picker.move_up();
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            picker.move_down();
            vec![]
        }
        KeyCode::Enter => {
            if let Some(id) = picker.selected_id() {
                let id = id.to_string();
                if let Err(e) = app.tui.store.select_session(&id) {
                    warn!(error = %e, "failed to select session");
                }
                sync_transcript(&mut app.tui);
            }
            app.picker = None;
            vec![]
        }
        KeyCode::Char('n') => {
            app.tui.store.create_session();
            sync_transcript(&mut app.tui);
            app.picker = None;
            vec![]
        }
        KeyCode::Char('d') => {
            if let Some(id) = picker.selected_id() {
                let id = id.to_string();
                if let Err(e) = app.tui.store.delete_session(&id) {
                    warn!(error = %e, "failed to delete session");
                }
                sync_transcript(&mut app.tui);
                if let Some(picker) = &mut app.picker {
                    picker.refresh(app.tui.store.summaries());
                }
            }
            vec![]
        }
        _ => vec![],
    }
}

/// Re-mirrors the transcript from the current session, restoring the pending
/// indicator if the in-flight request originated there.
fn sync_transcript(tui: &mut TuiState) {
    tui.transcript.show_session(tui.store.current_session());
    if tui.awaiting_current_session() {
        tui.transcript.set_pending();
    }
}
