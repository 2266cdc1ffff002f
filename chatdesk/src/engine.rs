//! Chat engine: the single entry point for adapter intents.
//!
//! Wires the session store to the message sequencer so that cross-cutting
//! rules live in one place, chiefly that deleting a session cancels its
//! pending response before the session disappears.

use tracing::info;

use crate::catalog::ModelSelection;
use crate::models::SessionId;
use crate::sequencer::MessageSequencer;
use crate::simulator::{ResponseReady, ResponseSimulator};
use crate::store::SessionStore;
use crate::view::{ActiveSessionView, ChatView, SidebarEntry};

/// Owns all chat state for one process.
pub struct ChatEngine<S: ResponseSimulator> {
    store: SessionStore,
    sequencer: MessageSequencer<S>,
    model: ModelSelection,
}

impl<S: ResponseSimulator> ChatEngine<S> {
    pub fn new(simulator: S) -> Self {
        Self {
            store: SessionStore::new(),
            sequencer: MessageSequencer::new(simulator),
            model: ModelSelection::default(),
        }
    }

    pub fn create_session(&mut self) -> SessionId {
        let id = self.store.create_session();
        info!(session = %id, "session created");
        id
    }

    pub fn select_session(&mut self, id: SessionId) -> bool {
        self.store.select_session(id)
    }

    pub fn rename_session(&mut self, id: SessionId, name: &str) -> bool {
        self.store.rename_session(id, name)
    }

    /// Delete a session, cancelling any response still in flight for it.
    pub fn delete_session(&mut self, id: SessionId) -> bool {
        self.sequencer.cancel_pending(id);
        let removed = self.store.remove_session(id).is_some();
        if removed {
            info!(session = %id, "session deleted");
        }
        removed
    }

    pub fn send_user_message(&mut self, id: SessionId, text: &str) -> bool {
        self.sequencer.send_user_message(&mut self.store, id, text)
    }

    pub fn cancel_pending(&mut self, id: SessionId) -> bool {
        self.sequencer.cancel_pending(id)
    }

    pub fn on_response_ready(&mut self, ready: ResponseReady) -> bool {
        self.sequencer.on_response_ready(&mut self.store, ready)
    }

    pub fn select_model(&mut self, id: &str) -> bool {
        self.model.select(id)
    }

    pub fn is_pending(&self, id: SessionId) -> bool {
        self.sequencer.is_pending(id)
    }

    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Build the render snapshot for the current state.
    pub fn view(&self) -> ChatView {
        let sessions = self
            .store
            .sessions()
            .iter()
            .map(|s| SidebarEntry {
                id: s.id,
                name: s.name.clone(),
            })
            .collect();

        let active = self.store.active().map(|s| ActiveSessionView {
            id: s.id,
            name: s.name.clone(),
            transcript: s.transcript().to_vec(),
        });
        let pending = active.as_ref().is_some_and(|a| self.is_pending(a.id));

        ChatView::new(sessions, active, pending, self.model.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::fake::FakeSimulator;
    use crate::view::EXAMPLE_PROMPTS;

    fn engine() -> (ChatEngine<FakeSimulator>, FakeSimulator) {
        let fake = FakeSimulator::default();
        (ChatEngine::new(fake.clone()), fake)
    }

    #[test]
    fn test_delete_during_pending_cancels_and_discards() {
        let (mut engine, fake) = engine();
        let s = engine.create_session();

        engine.send_user_message(s, "hi");
        let started = fake.last();
        assert!(engine.delete_session(s));

        assert!(started.is_cancelled());
        assert!(!engine.is_pending(s));
        assert!(!engine.on_response_ready(started.ready()));
        assert!(engine.store().is_empty());
        assert_eq!(engine.store().active_id(), None);
    }

    #[test]
    fn test_delete_does_not_touch_other_sessions() {
        let (mut engine, fake) = engine();
        let a = engine.create_session();
        engine.send_user_message(a, "keep");
        let for_a = fake.last();
        let b = engine.create_session();

        engine.delete_session(b);
        assert!(!for_a.is_cancelled());
        assert!(engine.is_pending(a));
        assert_eq!(engine.store().active_id(), None);
    }

    #[test]
    fn test_view_tracks_active_session() {
        let (mut engine, fake) = engine();
        assert!(engine.view().is_welcome());

        let a = engine.create_session();
        let view = engine.view();
        assert_eq!(view.active.as_ref().unwrap().id, a);
        assert!(view.input_enabled);
        assert_eq!(view.example_prompts, EXAMPLE_PROMPTS);

        engine.send_user_message(a, "hi");
        let view = engine.view();
        assert!(view.pending);
        assert!(!view.input_enabled);
        assert!(view.example_prompts.is_empty());

        // pending belongs to `a`, not to whichever session is on screen
        let b = engine.create_session();
        let view = engine.view();
        assert_eq!(view.active.as_ref().unwrap().id, b);
        assert!(!view.pending);
        assert_eq!(view.sessions.len(), 2);

        engine.select_session(a);
        engine.on_response_ready(fake.last().ready());
        let view = engine.view();
        assert!(!view.pending);
        assert_eq!(view.active.unwrap().transcript.len(), 2);
    }

    #[test]
    fn test_sidebar_reflects_rename() {
        let (mut engine, _) = engine();
        let a = engine.create_session();
        engine.rename_session(a, "Trip");
        engine.rename_session(a, " ");

        let view = engine.view();
        assert_eq!(
            view.sessions,
            vec![SidebarEntry {
                id: a,
                name: "Trip".to_string()
            }]
        );
    }

    #[test]
    fn test_select_model_in_view() {
        let (mut engine, _) = engine();
        assert!(engine.select_model("gpt-4"));
        assert_eq!(engine.view().selected_model, "gpt-4");
    }
}
