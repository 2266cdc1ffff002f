//! Message model representing one turn in a session transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply produced by the responder.
    Assistant,
}

impl MessageRole {
    /// Convert role to its wire string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse role from its wire string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message in a session transcript.
///
/// Fields are private: once appended, neither the role nor the content of a
/// message can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    role: MessageRole,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into())
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content.into())
    }

    fn new(role: MessageRole, content: String) -> Self {
        Self {
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub const fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!(MessageRole::from_str("assistant"), Some(MessageRole::Assistant));
        assert_eq!(MessageRole::from_str("system"), None);
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }
}
