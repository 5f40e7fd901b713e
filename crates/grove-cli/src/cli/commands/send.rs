//! One-shot send command handler.
//!
//! Sends a single message through the same pipeline as the TUI: the user
//! message is appended to a session (the most recent one by default),
//! the responder is called once, and the reply is appended and printed.

use anyhow::{Context, Result, anyhow};
use grove_core::config::Config;
use grove_core::responder::Responder;
use grove_core::session::{Role, SessionStore, Storage};

pub async fn run(message: &str, session_id: Option<&str>, config: &Config) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        anyhow::bail!("Message cannot be empty");
    }

    let mut store = SessionStore::load(Storage::from_env());
    if let Some(id) = session_id {
        store
            .select_session(id)
            .with_context(|| format!("select session '{id}'"))?;
    }
    let session_id = store.current_id().to_string();

    store
        .append_message(&session_id, Role::User, message)
        .context("append user message")?;

    let responder = Responder::from_config(config);
    let reply = responder
        .ask(message)
        .await
        .map_err(|e| anyhow!(e.transcript_message()))?;

    store
        .append_message(&session_id, Role::Assistant, &reply)
        .context("append assistant message")?;

    println!("{reply}");
    Ok(())
}
