//! Session and message data model.
//!
//! A session is one conversation thread: an append-only message log plus a
//! title and timestamps. Messages are immutable once appended; sessions are
//! only ever mutated by appending a message (which bumps `updated_at` and may
//! derive the title) or deleted wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to a session before its first user message arrives.
pub const TITLE_PLACEHOLDER: &str = "New Chat";

/// Content longer than this is truncated when deriving a session title.
const TITLE_MAX_CHARS: usize = 30;

/// Characters kept from the content when the title is truncated.
const TITLE_PREFIX_CHARS: usize = 28;

/// Marker appended to a truncated title.
const TITLE_MARKER: &str = "...";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Returns the display label for this role.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Grove",
        }
    }
}

/// One immutable turn in a session's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message with a fresh identifier and the current timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session with the placeholder title.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: TITLE_PLACEHOLDER.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message, bumping `updated_at` monotonically and deriving the
    /// title from the first user message.
    ///
    /// Returns a clone of the stored message for incremental display.
    pub fn push_message(&mut self, role: Role, content: impl Into<String>) -> Message {
        let message = Message::new(role, content);

        // The placeholder check keeps manually renamed titles intact.
        if role == Role::User && self.title == TITLE_PLACEHOLDER {
            self.title = derive_title(&message.content);
        }

        // max() guards against a clock that stepped backwards between appends
        self.updated_at = Utc::now().max(self.updated_at);
        self.messages.push(message.clone());
        message
    }

    /// Returns true if no message has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a session title from message content, truncating long content to a
/// prefix plus a marker.
pub fn derive_title(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        return trimmed.to_string();
    }

    let prefix: String = trimmed.chars().take(TITLE_PREFIX_CHARS).collect();
    format!("{}{}", prefix.trim_end(), TITLE_MARKER)
}

/// Summary of a session for list displays.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            message_count: session.messages.len(),
            updated_at: session.updated_at,
        }
    }
}

/// Formats a timestamp as a short relative age (e.g., "2m ago", "3h ago").
pub fn format_timestamp_relative(time: DateTime<Utc>) -> String {
    let now = Utc::now();
    let seconds = now.signed_duration_since(time).num_seconds().max(0);

    let mins = seconds / 60;
    if mins < 1 {
        return "just now".to_string();
    }
    if mins < 60 {
        return format!("{mins}m ago");
    }

    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }

    let weeks = days / 7;
    if weeks < 5 {
        return format!("{weeks}w ago");
    }

    let months = days / 30;
    if months < 12 {
        return format!("{months}mo ago");
    }

    let years = days / 365;
    format!("{years}y ago")
}
