//! Session model representing one independent conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;

/// Name given to every freshly created session.
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

/// Unique, time-ordered identifier of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a UUIDv7 (time-ordered, monotonic within the process).
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier of one simulated request, unique across the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// A chat session with its ordered transcript.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Stable identifier assigned at creation.
    pub id: SessionId,
    /// Display name shown in the sidebar.
    pub name: String,
    /// Messages in conversational order.
    transcript: Vec<Message>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session with the default name.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            name: DEFAULT_SESSION_NAME.to_string(),
            transcript: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Append a message at the end of the transcript.
    pub(crate) fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(SessionId::generate());
        assert_eq!(session.name, "New Chat");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_session_ids_are_ordered() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_session_id_parse_roundtrip() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
