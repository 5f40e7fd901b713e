//! UI event types.
//!
//! All inputs to the TUI are converted to `UiEvent` before being processed by
//! the reducer. Async results (responder replies) arrive via the runtime's
//! event inbox as separate events.

use crossterm::event::Event as CrosstermEvent;
use grove_core::responder::ResponderError;

/// Unified event enum for the TUI.
///
/// The reducer (`update`) pattern-matches on these events to update state.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (for animation, polling).
    Tick,

    /// Terminal input event (key, resize).
    Terminal(CrosstermEvent),

    /// Responder request resolved.
    ///
    /// `session_id` is the session that originated the request; the reply is
    /// routed there even if the user switched sessions while waiting.
    ReplyArrived {
        session_id: String,
        result: Result<String, ResponderError>,
    },
}
