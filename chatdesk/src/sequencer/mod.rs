//! Message sequencer: turn ordering and the single in-flight response rule.
//!
//! Each session is either idle or awaiting exactly one response. The pending
//! table remembers the [`RequestId`] it is waiting for; a completion carrying
//! any other id (cancelled, or for a deleted session) is discarded, which is
//! what lets a cancel win against a timer that already fired.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::{Message, RequestId, SessionId};
use crate::simulator::{ResponseHandle, ResponseReady, ResponseSimulator};
use crate::store::SessionStore;

/// An outstanding simulated response.
#[derive(Debug)]
struct PendingResponse<H> {
    request_id: RequestId,
    handle: H,
}

/// Appends turns to transcripts and drives the response simulator.
pub struct MessageSequencer<S: ResponseSimulator> {
    simulator: S,
    pending: HashMap<SessionId, PendingResponse<S::Handle>>,
    next_request: u64,
}

impl<S: ResponseSimulator> MessageSequencer<S> {
    pub fn new(simulator: S) -> Self {
        Self {
            simulator,
            pending: HashMap::new(),
            next_request: 0,
        }
    }

    /// Append a user turn and start a response for it.
    ///
    /// Ignored when the text is blank, the session is unknown, or a response
    /// is already pending for the session (a second send is dropped, not
    /// queued).
    pub fn send_user_message(
        &mut self,
        store: &mut SessionStore,
        session_id: SessionId,
        text: &str,
    ) -> bool {
        if text.trim().is_empty() {
            debug!(session = %session_id, "ignoring blank message");
            return false;
        }
        if self.is_pending(session_id) {
            debug!(session = %session_id, "response already pending, ignoring send");
            return false;
        }
        if !store.append(session_id, Message::user(text)) {
            debug!(session = %session_id, "ignoring send to unknown session");
            return false;
        }

        self.next_request += 1;
        let request_id = RequestId(self.next_request);
        let handle = self.simulator.start(session_id, request_id, text);
        self.pending
            .insert(session_id, PendingResponse { request_id, handle });
        info!(session = %session_id, request = %request_id, "awaiting response");
        true
    }

    /// Deliver a finished reply.
    ///
    /// Only the currently pending request of a live session is applied;
    /// anything else is stale and dropped without touching state.
    pub fn on_response_ready(&mut self, store: &mut SessionStore, ready: ResponseReady) -> bool {
        let expected = self.pending.get(&ready.session_id).map(|p| p.request_id);
        if expected != Some(ready.request_id) {
            debug!(
                session = %ready.session_id,
                request = %ready.request_id,
                "discarding stale response"
            );
            return false;
        }

        self.pending.remove(&ready.session_id);
        let applied = store.append(ready.session_id, Message::assistant(ready.content));
        if applied {
            info!(session = %ready.session_id, request = %ready.request_id, "response delivered");
        }
        applied
    }

    /// Cancel the pending response of a session, leaving its transcript as is.
    pub fn cancel_pending(&mut self, session_id: SessionId) -> bool {
        let Some(pending) = self.pending.remove(&session_id) else {
            debug!(session = %session_id, "nothing pending to cancel");
            return false;
        };
        pending.handle.cancel();
        info!(session = %session_id, request = %pending.request_id, "response cancelled");
        true
    }

    pub fn is_pending(&self, session_id: SessionId) -> bool {
        self.pending.contains_key(&session_id)
    }

    /// Number of sessions currently awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
