//! Fixed-delay canned responder backed by tokio timers.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use super::{ReplyTemplate, ResponseHandle, ResponseReady, ResponseSimulator};
use crate::models::{RequestId, SessionId};

/// Default delay before the canned reply is delivered.
pub const DEFAULT_RESPONSE_DELAY: Duration = Duration::from_secs(3);

/// Replies to every message with a templated echo after a fixed delay.
///
/// Each `start` spawns one tokio task; completions are pushed onto the
/// channel handed to [`DelayedEcho::new`].
#[derive(Debug, Clone)]
pub struct DelayedEcho {
    delay: Duration,
    template: ReplyTemplate,
    completions: mpsc::UnboundedSender<ResponseReady>,
}

impl DelayedEcho {
    pub const fn new(
        delay: Duration,
        template: ReplyTemplate,
        completions: mpsc::UnboundedSender<ResponseReady>,
    ) -> Self {
        Self {
            delay,
            template,
            completions,
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Handle to a scheduled echo. Cancelling aborts the timer task.
#[derive(Debug)]
pub struct EchoHandle {
    abort: AbortHandle,
}

impl ResponseHandle for EchoHandle {
    fn cancel(&self) {
        self.abort.abort();
    }
}

impl ResponseSimulator for DelayedEcho {
    type Handle = EchoHandle;

    fn start(&self, session_id: SessionId, request_id: RequestId, user_text: &str) -> EchoHandle {
        let delay = self.delay;
        let content = self.template.compose(user_text);
        let completions = self.completions.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(session = %session_id, request = %request_id, "simulated response ready");
            let ready = ResponseReady {
                session_id,
                request_id,
                content,
            };
            if completions.send(ready).is_err() {
                warn!(request = %request_id, "completion channel closed, dropping response");
            }
        });

        EchoHandle {
            abort: task.abort_handle(),
        }
    }
}
