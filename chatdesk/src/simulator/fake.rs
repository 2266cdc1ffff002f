//! Recording simulator for driving the sequencer without timers.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{ReplyTemplate, ResponseHandle, ResponseReady, ResponseSimulator};
use crate::models::{RequestId, SessionId};

/// A request the fake was asked to start.
#[derive(Debug, Clone)]
pub struct Started {
    pub session_id: SessionId,
    pub request_id: RequestId,
    pub user_text: String,
    pub cancelled: Arc<AtomicBool>,
}

impl Started {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The completion the real echo would deliver for this request.
    pub fn ready(&self) -> ResponseReady {
        ResponseReady {
            session_id: self.session_id,
            request_id: self.request_id,
            content: ReplyTemplate::default().compose(&self.user_text),
        }
    }
}

#[derive(Debug)]
pub struct FakeHandle(Arc<AtomicBool>);

impl ResponseHandle for FakeHandle {
    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Records every `start` call; tests deliver completions by hand.
#[derive(Debug, Clone, Default)]
pub struct FakeSimulator {
    started: Rc<RefCell<Vec<Started>>>,
}

impl FakeSimulator {
    pub fn started(&self) -> Vec<Started> {
        self.started.borrow().clone()
    }

    pub fn last(&self) -> Started {
        self.started
            .borrow()
            .last()
            .cloned()
            .expect("no request was started")
    }
}

impl ResponseSimulator for FakeSimulator {
    type Handle = FakeHandle;

    fn start(&self, session_id: SessionId, request_id: RequestId, user_text: &str) -> FakeHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.started.borrow_mut().push(Started {
            session_id,
            request_id,
            user_text: user_text.to_string(),
            cancelled: Arc::clone(&cancelled),
        });
        FakeHandle(cancelled)
    }
}
