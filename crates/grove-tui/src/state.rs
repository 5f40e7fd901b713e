//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── store: SessionStore         (sessions, current selection)
//! │   ├── input: InputState           (editing buffer)
//! │   ├── transcript: TranscriptState (cells, scroll, pending)
//! │   ├── coordinator: CoordinatorState (single-flight request state)
//! │   └── display_mode: DisplayMode
//! └── picker: Option<SessionPickerState> (modal overlay)
//! ```
//!
//! The picker is stored separately from `TuiState` so overlay handling can
//! take `&mut` to both without borrow conflicts.

use grove_core::session::{DisplayMode, SessionStore};

use crate::input::InputState;
use crate::session_picker::SessionPickerState;
use crate::transcript::TranscriptState;

/// Request coordinator state.
///
/// At most one responder request is in flight. While `AwaitingReply`,
/// submission is disabled; the stored id routes the reply to the session that
/// originated the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No request in flight, ready for input.
    Idle,
    /// Waiting on the responder for this session's message.
    AwaitingReply { session_id: String },
}

impl CoordinatorState {
    /// Returns true if a request is in flight.
    pub fn is_awaiting(&self) -> bool {
        matches!(self, CoordinatorState::AwaitingReply { .. })
    }
}

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub picker: Option<SessionPickerState>,
}

impl AppState {
    pub fn new(store: SessionStore, display_mode: DisplayMode) -> Self {
        Self {
            tui: TuiState::new(store, display_mode),
            picker: None,
        }
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Session store (collection, current selection, persistence).
    pub store: SessionStore,
    /// User input state.
    pub input: InputState,
    /// Transcript display state for the current session.
    pub transcript: TranscriptState,
    /// Responder request state.
    pub coordinator: CoordinatorState,
    /// Light or dark rendering.
    pub display_mode: DisplayMode,
    /// Spinner animation frame counter (for the pending indicator).
    pub spinner_frame: usize,
    /// Transcript layout measured during render: (total lines, viewport
    /// height). Used by scroll handling; a `Cell` because render takes
    /// `&AppState`.
    pub transcript_view: std::cell::Cell<(usize, usize)>,
}

impl TuiState {
    pub fn new(store: SessionStore, display_mode: DisplayMode) -> Self {
        let mut transcript = TranscriptState::new();
        transcript.show_session(store.current_session());

        Self {
            should_quit: false,
            store,
            input: InputState::new(),
            transcript,
            coordinator: CoordinatorState::Idle,
            display_mode,
            spinner_frame: 0,
            transcript_view: std::cell::Cell::new((0, 0)),
        }
    }

    /// Returns true if the pending request originated in the current session.
    pub fn awaiting_current_session(&self) -> bool {
        match &self.coordinator {
            CoordinatorState::AwaitingReply { session_id } => {
                session_id.as_str() == self.store.current_id()
            }
            CoordinatorState::Idle => false,
        }
    }
}
