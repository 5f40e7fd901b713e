//! Session picker overlay state.
//!
//! A modal list of all sessions, newest first. The reducer routes keys here
//! while the overlay is open; selection and windowing state live in this
//! module, list rendering lives in `render`.

use grove_core::session::SessionSummary;

/// Max rows shown in the picker at once.
pub const MAX_VISIBLE_SESSIONS: usize = 10;

/// Session picker overlay state.
#[derive(Debug)]
pub struct SessionPickerState {
    pub sessions: Vec<SessionSummary>,
    pub selected: usize,
    pub offset: usize,
}

impl SessionPickerState {
    /// Opens the picker over a summary list, pre-selecting the current session.
    pub fn open(sessions: Vec<SessionSummary>, current_id: &str) -> Self {
        let selected = sessions
            .iter()
            .position(|s| s.id == current_id)
            .unwrap_or(0);
        let mut state = Self {
            sessions,
            selected,
            offset: 0,
        };
        state.clamp();
        state
    }

    /// Replaces the list after a mutation (delete, new), keeping the cursor in
    /// bounds.
    pub fn refresh(&mut self, sessions: Vec<SessionSummary>) {
        self.sessions = sessions;
        self.clamp();
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.sessions.get(self.selected).map(|s| s.id.as_str())
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.clamp();
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.sessions.len() {
            self.selected += 1;
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.sessions.len().saturating_sub(1));
        if self.selected < self.offset {
            self.offset = self.selected;
        }
        if self.selected >= self.offset + MAX_VISIBLE_SESSIONS {
            self.offset = self.selected - MAX_VISIBLE_SESSIONS + 1;
        }
    }
}
