//! Response simulator seam.
//!
//! The sequencer only ever talks to a [`ResponseSimulator`] through `start`
//! and the returned handle's `cancel`, so a real backend can replace the
//! canned echo without touching session state.

mod echo;
#[cfg(test)]
pub(crate) mod fake;

pub use echo::{DelayedEcho, EchoHandle, DEFAULT_RESPONSE_DELAY};

use serde::Serialize;

use crate::models::{RequestId, SessionId};

/// Placeholder replaced by the user's text in a [`ReplyTemplate`].
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Reply format used by the canned responder.
pub const DEFAULT_REPLY_TEMPLATE: &str = "This is a simulated response to: \"{input}\"";

/// A completed reply travelling back to the sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseReady {
    pub session_id: SessionId,
    pub request_id: RequestId,
    pub content: String,
}

/// Cancellable reference to a scheduled, not-yet-delivered response.
pub trait ResponseHandle: Send {
    /// Prevent delivery. Safe to call after completion or more than once.
    fn cancel(&self);
}

/// Produces an assistant reply for a user message, asynchronously.
pub trait ResponseSimulator {
    type Handle: ResponseHandle;

    /// Schedule a reply to `user_text`. Completion is reported as a
    /// [`ResponseReady`] carrying the same session and request ids.
    fn start(&self, session_id: SessionId, request_id: RequestId, user_text: &str) -> Self::Handle;
}

/// Text template with a single `{input}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTemplate(String);

impl ReplyTemplate {
    /// Wrap a template. Callers are expected to have validated the placeholder.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitute the user's text into the template.
    pub fn compose(&self, user_text: &str) -> String {
        self.0.replace(INPUT_PLACEHOLDER, user_text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReplyTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        let reply = ReplyTemplate::default().compose("hi");
        assert_eq!(reply, "This is a simulated response to: \"hi\"");
    }

    #[test]
    fn test_custom_template() {
        let template = ReplyTemplate::new("echo <{input}>");
        assert_eq!(template.compose("ping"), "echo <ping>");
    }
}
