//! Chat runtime: one task that owns the engine.
//!
//! Adapter intents and simulator completions are both funnelled into this
//! task, so every state change happens on one logical thread in arrival
//! order. Each change is broadcast as a fresh [`ChatView`].

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::config::Config;
use crate::engine::ChatEngine;
use crate::error::RuntimeError;
use crate::models::SessionId;
use crate::simulator::{DelayedEcho, ResponseReady};
use crate::view::ChatView;

const INTENT_BUFFER: usize = 256;
const UPDATE_BUFFER: usize = 1000;

/// A user intent coming from a presentation adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    CreateSession,
    SelectSession { id: SessionId },
    RenameSession { id: SessionId, name: String },
    DeleteSession { id: SessionId },
    SendMessage { id: SessionId, text: String },
    CancelPending { id: SessionId },
    SelectModel { id: String },
    /// Read the current view without changing anything.
    Refresh,
}

/// Result of applying an intent.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Whether the intent changed state. Ignored intents report `false`.
    pub applied: bool,
    /// Id of the session created by [`Intent::CreateSession`].
    pub created: Option<SessionId>,
    pub view: ChatView,
}

type Command = (Intent, oneshot::Sender<Outcome>);

/// Cloneable handle adapters use to talk to the runtime.
#[derive(Debug, Clone)]
pub struct ChatHandle {
    intents: mpsc::Sender<Command>,
    updates: broadcast::Sender<ChatView>,
}

impl ChatHandle {
    /// Apply an intent and wait for the resulting view.
    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.intents
            .send((intent, reply_tx))
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        reply_rx.await.map_err(|_| RuntimeError::Stopped)
    }

    pub async fn view(&self) -> Result<ChatView, RuntimeError> {
        Ok(self.dispatch(Intent::Refresh).await?.view)
    }

    /// Receive a view after every state change, including delivered replies.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatView> {
        self.updates.subscribe()
    }
}

/// Start the runtime task. It stops once every [`ChatHandle`] is dropped.
pub fn spawn(config: &Config) -> ChatHandle {
    let (intent_tx, intent_rx) = mpsc::channel(INTENT_BUFFER);
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();
    let (update_tx, _) = broadcast::channel(UPDATE_BUFFER);

    let simulator = DelayedEcho::new(
        config.response_delay,
        config.reply_template.clone(),
        completion_tx,
    );
    let engine = ChatEngine::new(simulator);

    tokio::spawn(run(engine, intent_rx, completion_rx, update_tx.clone()));

    ChatHandle {
        intents: intent_tx,
        updates: update_tx,
    }
}

async fn run(
    mut engine: ChatEngine<DelayedEcho>,
    mut intents: mpsc::Receiver<Command>,
    mut completions: mpsc::UnboundedReceiver<ResponseReady>,
    updates: broadcast::Sender<ChatView>,
) {
    info!("chat runtime started");
    loop {
        tokio::select! {
            command = intents.recv() => {
                let Some((intent, reply)) = command else { break };
                let outcome = apply(&mut engine, intent);
                if outcome.applied {
                    let _ = updates.send(outcome.view.clone());
                }
                let _ = reply.send(outcome);
            }
            Some(ready) = completions.recv() => {
                if engine.on_response_ready(ready) {
                    let _ = updates.send(engine.view());
                }
            }
        }
    }
    info!("chat runtime stopped");
}

fn apply(engine: &mut ChatEngine<DelayedEcho>, intent: Intent) -> Outcome {
    debug!(?intent, "applying intent");
    let mut created = None;
    let applied = match intent {
        Intent::CreateSession => {
            created = Some(engine.create_session());
            true
        }
        Intent::SelectSession { id } => engine.select_session(id),
        Intent::RenameSession { id, name } => engine.rename_session(id, &name),
        Intent::DeleteSession { id } => engine.delete_session(id),
        Intent::SendMessage { id, text } => engine.send_user_message(id, &text),
        Intent::CancelPending { id } => engine.cancel_pending(id),
        Intent::SelectModel { id } => engine.select_model(&id),
        Intent::Refresh => false,
    };
    Outcome {
        applied,
        created,
        view: engine.view(),
    }
}
