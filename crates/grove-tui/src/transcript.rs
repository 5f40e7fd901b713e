//! Transcript display state.
//!
//! The transcript shows the current session's message log as a list of cells,
//! with an optional pending cell at the end while a responder request is in
//! flight. Cells are display-only; the session store owns the durable log.

use grove_core::session::{Message, Session};

/// One visual cell in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptCell {
    /// A message from the session log.
    Message(Message),
    /// Waiting-for-reply indicator.
    Pending,
}

/// Transcript state: cells plus scroll position.
#[derive(Debug, Default)]
pub struct TranscriptState {
    cells: Vec<TranscriptCell>,
    /// Line offset from the top when not following the tail.
    scroll_offset: usize,
    /// When true the view sticks to the newest content.
    follow: bool,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            scroll_offset: 0,
            follow: true,
        }
    }

    pub fn cells(&self) -> &[TranscriptCell] {
        &self.cells
    }

    /// Replaces the transcript with a session's full message log.
    ///
    /// Used when switching sessions; any pending cell is dropped because the
    /// pending indicator belongs to the view, not the session.
    pub fn show_session(&mut self, session: &Session) {
        self.cells = session
            .messages
            .iter()
            .cloned()
            .map(TranscriptCell::Message)
            .collect();
        self.scroll_offset = 0;
        self.follow = true;
    }

    /// Appends one message, keeping the pending cell (if any) last.
    pub fn push_message(&mut self, message: Message) {
        let insert_at = match self.cells.last() {
            Some(TranscriptCell::Pending) => self.cells.len() - 1,
            _ => self.cells.len(),
        };
        self.cells.insert(insert_at, TranscriptCell::Message(message));
        self.follow = true;
    }

    /// Shows the pending indicator. Idempotent.
    pub fn set_pending(&mut self) {
        if !self.has_pending() {
            self.cells.push(TranscriptCell::Pending);
            self.follow = true;
        }
    }

    /// Clears the pending indicator. Idempotent.
    pub fn clear_pending(&mut self) {
        self.cells.retain(|c| !matches!(c, TranscriptCell::Pending));
    }

    pub fn has_pending(&self) -> bool {
        self.cells
            .iter()
            .any(|c| matches!(c, TranscriptCell::Pending))
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Scrolls up by one line, detaching from the tail.
    pub fn scroll_up(&mut self, total_lines: usize, viewport_height: usize) {
        let max_offset = total_lines.saturating_sub(viewport_height);
        if self.follow {
            self.scroll_offset = max_offset;
            self.follow = false;
        }
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scrolls down by one line, re-attaching to the tail at the bottom.
    pub fn scroll_down(&mut self, total_lines: usize, viewport_height: usize) {
        let max_offset = total_lines.saturating_sub(viewport_height);
        if self.follow {
            return;
        }
        self.scroll_offset += 1;
        if self.scroll_offset >= max_offset {
            self.scroll_offset = max_offset;
            self.follow = true;
        }
    }
}
