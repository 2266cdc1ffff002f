//! Render state handed to presentation adapters.

use serde::{Deserialize, Serialize};

use crate::catalog::{ModelOption, MODELS};
use crate::models::{Message, SessionId};

/// Prompts suggested while the active session is still empty.
pub const EXAMPLE_PROMPTS: &[&str] = &[
    "Explain quantum computing in simple terms",
    "Write a poem about artificial intelligence",
    "How do I make a perfect cup of coffee?",
    "What are the best practices for sustainable living?",
];

/// How far from the bottom (in pixels) the view may drift before the
/// scroll-to-bottom button appears.
pub const SCROLL_BUTTON_THRESHOLD: f64 = 100.0;

/// One row of the session sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub id: SessionId,
    pub name: String,
}

/// The session currently on screen.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSessionView {
    pub id: SessionId,
    pub name: String,
    pub transcript: Vec<Message>,
}

/// Full snapshot of what an adapter needs to draw.
#[derive(Debug, Clone, Serialize)]
pub struct ChatView {
    /// Sessions in creation order.
    pub sessions: Vec<SidebarEntry>,
    /// `None` renders the welcome screen.
    pub active: Option<ActiveSessionView>,
    /// A response is pending for the active session (loading indicator,
    /// stop button).
    pub pending: bool,
    pub input_enabled: bool,
    pub example_prompts: Vec<&'static str>,
    pub models: &'static [ModelOption],
    pub selected_model: &'static str,
}

impl ChatView {
    pub(crate) fn new(
        sessions: Vec<SidebarEntry>,
        active: Option<ActiveSessionView>,
        pending: bool,
        selected_model: &'static ModelOption,
    ) -> Self {
        let input_enabled = active.is_some() && !pending;
        let example_prompts = match &active {
            Some(a) if a.transcript.is_empty() => EXAMPLE_PROMPTS.to_vec(),
            _ => Vec::new(),
        };
        Self {
            sessions,
            active,
            pending,
            input_enabled,
            example_prompts,
            models: MODELS,
            selected_model: selected_model.id,
        }
    }

    pub const fn is_welcome(&self) -> bool {
        self.active.is_none()
    }
}

/// Scroll position reported by a transcript container.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Whether the scroll-to-bottom button should be visible.
    pub fn show_scroll_button(&self) -> bool {
        self.scroll_height - self.scroll_top > self.client_height + SCROLL_BUTTON_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_button_threshold() {
        let near_bottom = ScrollMetrics {
            scroll_top: 1000.0,
            scroll_height: 1500.0,
            client_height: 500.0,
        };
        assert!(!near_bottom.show_scroll_button());

        let exactly_at_threshold = ScrollMetrics {
            scroll_top: 900.0,
            ..near_bottom
        };
        assert!(!exactly_at_threshold.show_scroll_button());

        let scrolled_up = ScrollMetrics {
            scroll_top: 899.0,
            ..near_bottom
        };
        assert!(scrolled_up.show_scroll_button());
    }

    #[test]
    fn test_welcome_view() {
        let view = ChatView::new(Vec::new(), None, false, &MODELS[0]);
        assert!(view.is_welcome());
        assert!(!view.input_enabled);
        assert!(view.example_prompts.is_empty());
        assert_eq!(view.selected_model, "gpt-3.5");
    }
}
