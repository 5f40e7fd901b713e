//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only, which keeps the reducer pure:
//! it mutates state and returns effects, never performs I/O itself.

use grove_core::session::DisplayMode;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Send a message to the remote responder on behalf of a session.
    ///
    /// The runtime replies with `UiEvent::ReplyArrived` carrying the same
    /// `session_id`.
    AskResponder { session_id: String, message: String },

    /// Persist the display-mode flag.
    SaveDisplayMode(DisplayMode),
}
