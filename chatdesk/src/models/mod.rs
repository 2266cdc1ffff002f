//! Data models for chat sessions and their transcripts.

mod message;
mod session;

pub use message::{Message, MessageRole};
pub use session::{RequestId, Session, SessionId, DEFAULT_SESSION_NAME};
