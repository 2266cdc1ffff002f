//! Selectable model catalog shown next to the session list.

use serde::Serialize;
use tracing::debug;

/// One entry of the model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
}

/// Models offered by the selector, first entry selected by default.
pub const MODELS: &[ModelOption] = &[
    ModelOption {
        id: "gpt-3.5",
        name: "GPT-3.5",
    },
    ModelOption {
        id: "gpt-4",
        name: "GPT-4",
    },
];

/// Currently selected model. The responder does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSelection(&'static ModelOption);

impl ModelSelection {
    /// Select the model with `id`. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        match MODELS.iter().find(|m| m.id == id) {
            Some(option) => {
                self.0 = option;
                true
            }
            None => {
                debug!(model = id, "ignoring unknown model");
                false
            }
        }
    }

    pub const fn current(&self) -> &'static ModelOption {
        self.0
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self(&MODELS[0])
    }
}
