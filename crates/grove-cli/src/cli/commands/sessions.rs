//! Session command handlers.
//!
//! These operate directly on storage rather than through `SessionStore`, so
//! read-only commands never create or persist anything as a side effect.

use anyhow::Result;
use grove_core::session::{SessionSummary, Storage, format_timestamp_relative};

pub fn list() -> Result<()> {
    let sessions = Storage::from_env().load_sessions();
    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    let mut summaries: Vec<SessionSummary> =
        sessions.values().map(SessionSummary::from_session).collect();
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));

    for summary in summaries {
        println!(
            "{}  {}  {}",
            summary.title,
            summary.id,
            format_timestamp_relative(summary.updated_at)
        );
    }
    Ok(())
}

pub fn show(id: &str) -> Result<()> {
    let sessions = Storage::from_env().load_sessions();
    let Some(session) = sessions.get(id) else {
        println!("Session '{id}' is empty or not found.");
        return Ok(());
    };
    if session.is_empty() {
        println!("Session '{id}' is empty or not found.");
        return Ok(());
    }

    println!("# {}", session.title);
    for message in &session.messages {
        println!();
        println!("### {}", message.role.label());
        println!("{}", message.content);
    }
    Ok(())
}

pub fn rename(id: &str, title: &str) -> Result<()> {
    let storage = Storage::from_env();
    let mut sessions = storage.load_sessions();
    let Some(session) = sessions.get_mut(id) else {
        anyhow::bail!("Session '{id}' not found");
    };

    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Session title cannot be empty");
    }
    session.title = title.to_string();
    storage.save_sessions(&sessions)?;

    println!("Renamed session {id} → {title}");
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let storage = Storage::from_env();
    let mut sessions = storage.load_sessions();
    if sessions.remove(id).is_none() {
        anyhow::bail!("Session '{id}' not found");
    }
    storage.save_sessions(&sessions)?;

    println!("Deleted session {id}");
    Ok(())
}
