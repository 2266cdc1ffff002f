//! Error types for the layers around the chat engine.
//!
//! The engine itself never fails: invalid intents are ignored. These errors
//! cover configuration and the runtime plumbing adapters talk through.

use thiserror::Error;

/// Invalid startup configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("response delay must be greater than zero")]
    ZeroDelay,

    #[error("reply template must contain the {{input}} placeholder: {0:?}")]
    MissingPlaceholder(String),
}

/// Failure reaching the chat runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("chat runtime has stopped")]
    Stopped,
}
