//! In-memory session store backed by durable storage.
//!
//! The store owns the full session collection and the current-session pointer.
//! Every mutation persists the collection before returning; a persistence
//! failure is logged and the in-memory state kept, so a read-only disk
//! degrades the app to session-scoped memory instead of an error loop.

use anyhow::{Result, bail};
use tracing::warn;

use super::model::{Message, Role, Session, SessionSummary};
use super::storage::{SessionCollection, Storage};

/// Owns the session collection and the current-session selection.
#[derive(Debug)]
pub struct SessionStore {
    sessions: SessionCollection,
    current: String,
    storage: Storage,
}

impl SessionStore {
    /// Loads the store from storage and establishes a current session.
    ///
    /// An empty (or unreadable) collection gets a fresh session; otherwise the
    /// most recently updated session becomes current. The selection itself is
    /// never persisted.
    pub fn load(storage: Storage) -> Self {
        let sessions = storage.load_sessions();

        let mut store = Self {
            sessions,
            current: String::new(),
            storage,
        };

        match store.most_recent_id() {
            Some(id) => store.current = id,
            None => {
                store.create_session();
            }
        }

        store
    }

    /// Creates a fresh session, selects it, and persists.
    ///
    /// Returns the new session's id.
    pub fn create_session(&mut self) -> String {
        let session = Session::new();
        let id = session.id.clone();
        self.sessions.insert(id.clone(), session);
        self.current = id.clone();
        self.persist();
        id
    }

    /// Selects an existing session as current.
    pub fn select_session(&mut self, id: &str) -> Result<()> {
        if !self.sessions.contains_key(id) {
            bail!("No session with id {id}");
        }
        self.current = id.to_string();
        Ok(())
    }

    /// Appends a message to a session by id and persists.
    ///
    /// Returns a clone of the stored message. The target does not have to be
    /// the current session; replies land in the session that originated the
    /// request even if the user switched away.
    pub fn append_message(
        &mut self,
        session_id: &str,
        role: Role,
        content: impl Into<String>,
    ) -> Result<Message> {
        let Some(session) = self.sessions.get_mut(session_id) else {
            bail!("No session with id {session_id}");
        };
        let message = session.push_message(role, content);
        self.persist();
        Ok(message)
    }

    /// Renames a session and persists. The title no longer tracks message
    /// content after an explicit rename.
    pub fn rename_session(&mut self, session_id: &str, title: impl Into<String>) -> Result<()> {
        let Some(session) = self.sessions.get_mut(session_id) else {
            bail!("No session with id {session_id}");
        };
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            bail!("Session title cannot be empty");
        }
        session.title = title.to_string();
        self.persist();
        Ok(())
    }

    /// Deletes a session and persists.
    ///
    /// If the deleted session was current, selection falls back to the most
    /// recently updated survivor, or a fresh session when none remain.
    pub fn delete_session(&mut self, session_id: &str) -> Result<()> {
        if self.sessions.remove(session_id).is_none() {
            bail!("No session with id {session_id}");
        }

        if self.current == session_id {
            match self.most_recent_id() {
                Some(id) => self.current = id,
                None => {
                    self.create_session();
                    return Ok(());
                }
            }
        }

        self.persist();
        Ok(())
    }

    /// Returns the id of the current session.
    pub fn current_id(&self) -> &str {
        &self.current
    }

    /// Returns the current session.
    pub fn current_session(&self) -> &Session {
        // The store never leaves current pointing at a missing session.
        &self.sessions[&self.current]
    }

    /// Returns a session by id.
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Returns true if a session with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Returns the number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns summaries of all sessions, most recently updated first.
    ///
    /// Ties break on id so the order is stable across calls.
    pub fn summaries(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .values()
            .map(SessionSummary::from_session)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        summaries
    }

    fn most_recent_id(&self) -> Option<String> {
        self.sessions
            .values()
            .max_by(|a, b| a.updated_at.cmp(&b.updated_at).then(b.id.cmp(&a.id)))
            .map(|s| s.id.clone())
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save_sessions(&self.sessions) {
            warn!(error = %e, "failed to persist sessions, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn store_in(dir: &std::path::Path) -> SessionStore {
        SessionStore::load(Storage::new(dir))
    }

    #[test]
    fn test_load_empty_creates_fresh_session() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        assert_eq!(store.len(), 1);
        assert!(store.current_session().is_empty());
    }

    #[test]
    fn test_load_selects_most_recently_updated() {
        let dir = tempdir().unwrap();
        let older_id;
        let newer_id;
        {
            let mut store = store_in(dir.path());
            older_id = store.create_session();
            store
                .append_message(&older_id, Role::User, "older")
                .unwrap();
            newer_id = store.create_session();
            store
                .append_message(&newer_id, Role::User, "newer")
                .unwrap();
        }

        let store = store_in(dir.path());
        assert_eq!(store.current_id(), newer_id);
        assert_ne!(store.current_id(), older_id);
    }

    #[test]
    fn test_create_session_selects_it() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let id = store.create_session();
        assert_eq!(store.current_id(), id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_select_unknown_session_fails() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        assert!(store.select_session("no-such-id").is_err());
    }

    #[test]
    fn test_append_routes_to_requested_session() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let origin = store.current_id().to_string();
        store.append_message(&origin, Role::User, "question").unwrap();

        // Switch away, then deliver the reply to the origin session.
        store.create_session();
        store
            .append_message(&origin, Role::Assistant, "answer")
            .unwrap();

        let session = store.session(&origin).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert!(store.current_session().is_empty());
    }

    #[test]
    fn test_append_to_missing_session_fails() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        assert!(store
            .append_message("gone", Role::Assistant, "late reply")
            .is_err());
    }

    #[test]
    fn test_rename_session() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let id = store.current_id().to_string();
        store.rename_session(&id, "Plans").unwrap();
        assert_eq!(store.current_session().title, "Plans");

        // Appending after a rename must not overwrite the explicit title.
        store.append_message(&id, Role::User, "hello").unwrap();
        assert_eq!(store.current_session().title, "Plans");
    }

    #[test]
    fn test_rename_rejects_blank_title() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let id = store.current_id().to_string();
        assert!(store.rename_session(&id, "   ").is_err());
    }

    #[test]
    fn test_delete_current_falls_back_to_most_recent() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let first = store.current_id().to_string();
        store.append_message(&first, Role::User, "one").unwrap();
        let second = store.create_session();
        store.append_message(&second, Role::User, "two").unwrap();

        store.delete_session(&second).unwrap();
        assert_eq!(store.current_id(), first);
    }

    #[test]
    fn test_delete_last_session_creates_fresh_one() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let only = store.current_id().to_string();
        store.delete_session(&only).unwrap();

        assert_eq!(store.len(), 1);
        assert_ne!(store.current_id(), only);
        assert!(store.current_session().is_empty());
    }

    #[test]
    fn test_delete_non_current_keeps_selection() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let first = store.current_id().to_string();
        let second = store.create_session();

        store.delete_session(&first).unwrap();
        assert_eq!(store.current_id(), second);
    }

    #[test]
    fn test_delete_unknown_session_fails() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        assert!(store.delete_session("no-such-id").is_err());
    }

    #[test]
    fn test_summaries_sorted_newest_first() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let first = store.current_id().to_string();
        store.append_message(&first, Role::User, "a").unwrap();
        let second = store.create_session();
        store.append_message(&second, Role::User, "b").unwrap();
        // Touch the first session again so it becomes the newest.
        store.append_message(&first, Role::User, "c").unwrap();

        let summaries = store.summaries();
        assert_eq!(summaries[0].id, first);
        assert_eq!(summaries[1].id, second);
        assert_eq!(summaries[0].message_count, 2);
    }

    #[test]
    fn test_mutations_survive_reload() {
        let dir = tempdir().unwrap();
        let id;
        {
            let mut store = store_in(dir.path());
            id = store.current_id().to_string();
            store.append_message(&id, Role::User, "persist me").unwrap();
            store.rename_session(&id, "Kept").unwrap();
        }

        let store = store_in(dir.path());
        let session = store.session(&id).unwrap();
        assert_eq!(session.title, "Kept");
        assert_eq!(session.messages[0].content, "persist me");
    }
}
