//! Session store: the set of sessions and the active selection.
//!
//! Invalid intents (unknown ids, blank names) are ignored and leave the store
//! untouched. Every mutator reports whether it changed anything so callers can
//! log and skip re-rendering.

use tracing::debug;

use crate::models::{Message, Session, SessionId};

/// Owns every live session in creation order.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active_id: Option<SessionId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session named "New Chat" and make it active.
    pub fn create_session(&mut self) -> SessionId {
        let id = SessionId::generate();
        self.sessions.push(Session::new(id));
        self.active_id = Some(id);
        id
    }

    /// Make `id` the active session. Unknown ids are ignored.
    pub fn select_session(&mut self, id: SessionId) -> bool {
        if !self.contains(id) {
            debug!(session = %id, "ignoring selection of unknown session");
            return false;
        }
        self.active_id = Some(id);
        true
    }

    /// Rename a session. Names that are empty after trimming are rejected.
    pub fn rename_session(&mut self, id: SessionId, new_name: &str) -> bool {
        if new_name.trim().is_empty() {
            debug!(session = %id, "ignoring blank session name");
            return false;
        }
        let Some(session) = self.get_mut(id) else {
            debug!(session = %id, "ignoring rename of unknown session");
            return false;
        };
        new_name.clone_into(&mut session.name);
        true
    }

    /// Remove a session, clearing the active selection if it pointed there.
    ///
    /// Never selects another session in its place.
    pub fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.id == id)?;
        if self.active_id == Some(id) {
            self.active_id = None;
        }
        Some(self.sessions.remove(index))
    }

    /// Append a message to a session's transcript. Returns false if the
    /// session no longer exists.
    pub(crate) fn append(&mut self, id: SessionId, message: Message) -> bool {
        match self.get_mut(id) {
            Some(session) => {
                session.push(message);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub const fn active_id(&self) -> Option<SessionId> {
        self.active_id
    }

    pub fn active(&self) -> Option<&Session> {
        self.active_id.and_then(|id| self.get(id))
    }

    /// Sessions in creation order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
