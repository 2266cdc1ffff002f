//! HTTP and WebSocket adapter over the chat runtime.
//!
//! Every route maps onto one [`Intent`]; the response is the resulting
//! [`Outcome`]. Ignored intents still answer `200` with `applied: false`.
//!
//! Endpoints:
//! - GET /api/view - Current render snapshot
//! - POST /api/sessions - Create a session
//! - PATCH /api/sessions/:id - Rename a session
//! - DELETE /api/sessions/:id - Delete a session
//! - POST /api/sessions/:id/select - Make a session active
//! - POST /api/sessions/:id/messages - Send a user message
//! - POST /api/sessions/:id/cancel - Stop the pending response
//! - PUT /api/model - Select a model
//! - GET /api/scroll-button - Scroll-to-bottom visibility for given metrics
//! - POST /api/intents - Apply a raw intent
//! - WS /ws - Views pushed on every change; accepts intents as text frames

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::error::RuntimeError;
use crate::models::SessionId;
use crate::runtime::{ChatHandle, Intent, Outcome};
use crate::view::{ChatView, ScrollMetrics};

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ScrollButtonResponse {
    pub show: bool,
}

// === Server Lifecycle ===

/// Build the router for a running chat runtime.
pub fn router(handle: ChatHandle) -> Router {
    Router::new()
        .route("/api/view", get(get_view))
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/{id}",
            patch(rename_session).delete(delete_session),
        )
        .route("/api/sessions/{id}/select", post(select_session))
        .route("/api/sessions/{id}/messages", post(send_message))
        .route("/api/sessions/{id}/cancel", post(cancel_pending))
        .route("/api/model", put(select_model))
        .route("/api/scroll-button", get(scroll_button))
        .route("/api/intents", post(apply_intent))
        .route("/ws", get(websocket_handler))
        .layer(CorsLayer::permissive())
        .with_state(handle)
}

/// Serve the adapter on localhost until the process is stopped.
pub async fn start_server(port: u16, handle: ChatHandle) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "chatdesk server listening");
    axum::serve(listener, router(handle))
        .await
        .context("Server error")
}

// === Handlers ===

async fn dispatch(handle: &ChatHandle, intent: Intent) -> Result<Json<Outcome>, StatusCode> {
    handle
        .dispatch(intent)
        .await
        .map(Json)
        .map_err(status_for)
}

fn status_for(err: RuntimeError) -> StatusCode {
    match err {
        RuntimeError::Stopped => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn get_view(State(handle): State<ChatHandle>) -> Result<Json<ChatView>, StatusCode> {
    handle.view().await.map(Json).map_err(status_for)
}

async fn create_session(State(handle): State<ChatHandle>) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, Intent::CreateSession).await
}

async fn rename_session(
    State(handle): State<ChatHandle>,
    Path(id): Path<SessionId>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, Intent::RenameSession { id, name: req.name }).await
}

async fn delete_session(
    State(handle): State<ChatHandle>,
    Path(id): Path<SessionId>,
) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, Intent::DeleteSession { id }).await
}

async fn select_session(
    State(handle): State<ChatHandle>,
    Path(id): Path<SessionId>,
) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, Intent::SelectSession { id }).await
}

async fn send_message(
    State(handle): State<ChatHandle>,
    Path(id): Path<SessionId>,
    Json(req): Json<SendRequest>,
) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, Intent::SendMessage { id, text: req.text }).await
}

async fn cancel_pending(
    State(handle): State<ChatHandle>,
    Path(id): Path<SessionId>,
) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, Intent::CancelPending { id }).await
}

async fn select_model(
    State(handle): State<ChatHandle>,
    Json(req): Json<SelectModelRequest>,
) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, Intent::SelectModel { id: req.id }).await
}

async fn scroll_button(Query(metrics): Query<ScrollMetrics>) -> Json<ScrollButtonResponse> {
    Json(ScrollButtonResponse {
        show: metrics.show_scroll_button(),
    })
}

async fn apply_intent(
    State(handle): State<ChatHandle>,
    Json(intent): Json<Intent>,
) -> Result<Json<Outcome>, StatusCode> {
    dispatch(&handle, intent).await
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(handle): State<ChatHandle>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, handle))
}

async fn handle_websocket(mut socket: WebSocket, handle: ChatHandle) {
    let mut updates = BroadcastStream::new(handle.subscribe());

    // Start every client from the current state.
    if let Ok(view) = handle.view().await {
        if send_view(&mut socket, &view).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            update = updates.next() => {
                match update {
                    Some(Ok(view)) => {
                        if send_view(&mut socket, &view).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(lagged)) => warn!(%lagged, "websocket client fell behind"),
                    None => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<Intent>(text.as_str()) {
                            // The resulting view reaches the client via the broadcast.
                            Ok(intent) => {
                                if handle.dispatch(intent).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => debug!(error = %e, "ignoring malformed websocket intent"),
                        }
                    }
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

async fn send_view(socket: &mut WebSocket, view: &ChatView) -> Result<(), axum::Error> {
    let Ok(json) = serde_json::to_string(view) else {
        return Ok(());
    };
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::runtime;

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_lifecycle_over_http() {
        let app = router(runtime::spawn(&Config::default()));

        let (status, created) = call(&app, Method::POST, "/api/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["created"].as_str().unwrap().to_string();
        assert_eq!(created["view"]["active"]["name"], "New Chat");

        let (_, renamed) = call(
            &app,
            Method::PATCH,
            &format!("/api/sessions/{id}"),
            Some(serde_json::json!({"name": "Trip"})),
        )
        .await;
        assert_eq!(renamed["applied"], true);
        assert_eq!(renamed["view"]["sessions"][0]["name"], "Trip");

        let (_, sent) = call(
            &app,
            Method::POST,
            &format!("/api/sessions/{id}/messages"),
            Some(serde_json::json!({"text": "hi"})),
        )
        .await;
        assert_eq!(sent["view"]["pending"], true);
        assert_eq!(sent["view"]["input_enabled"], false);

        let (_, cancelled) = call(&app, Method::POST, &format!("/api/sessions/{id}/cancel"), None).await;
        assert_eq!(cancelled["applied"], true);
        assert_eq!(cancelled["view"]["pending"], false);

        let (_, deleted) = call(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
        assert_eq!(deleted["applied"], true);
        assert_eq!(deleted["view"]["active"], Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignored_intent_is_ok() {
        let app = router(runtime::spawn(&Config::default()));
        let unknown = SessionId::generate();

        let (status, body) = call(&app, Method::POST, &format!("/api/sessions/{unknown}/select"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_session_id() {
        let app = router(runtime::spawn(&Config::default()));
        let (status, _) = call(&app, Method::POST, "/api/sessions/not-a-uuid/cancel", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_button() {
        let app = router(runtime::spawn(&Config::default()));
        let (_, body) = call(
            &app,
            Method::GET,
            "/api/scroll-button?scroll_top=0&scroll_height=2000&client_height=600",
            None,
        )
        .await;
        assert_eq!(body["show"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_intent() {
        let app = router(runtime::spawn(&Config::default()));
        let (_, body) = call(
            &app,
            Method::POST,
            "/api/intents",
            Some(serde_json::json!({"type": "select_model", "id": "gpt-4"})),
        )
        .await;
        assert_eq!(body["applied"], true);
        assert_eq!(body["view"]["selected_model"], "gpt-4");
    }
}
