//! Resolved runtime configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::simulator::{ReplyTemplate, INPUT_PLACEHOLDER};

/// Settings for the simulated responder.
#[derive(Debug, Clone)]
pub struct Config {
    /// Delay before a canned reply is delivered.
    pub response_delay: Duration,
    /// Reply format; `{input}` is replaced with the user's text.
    pub reply_template: ReplyTemplate,
}

impl Config {
    /// Validate raw settings.
    pub fn new(response_delay_ms: u64, reply_template: &str) -> Result<Self, ConfigError> {
        if response_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if !reply_template.contains(INPUT_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(reply_template.to_string()));
        }
        Ok(Self {
            response_delay: Duration::from_millis(response_delay_ms),
            reply_template: ReplyTemplate::new(reply_template),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            response_delay: crate::simulator::DEFAULT_RESPONSE_DELAY,
            reply_template: ReplyTemplate::default(),
        }
    }
}
