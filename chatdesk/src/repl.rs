//! Line-oriented terminal adapter.
//!
//! Plain lines are sent to the active session; lines starting with `/` are
//! commands. Sessions are addressed by their 1-based position in `/list`.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::models::{MessageRole, SessionId};
use crate::runtime::{ChatHandle, Intent};
use crate::view::ChatView;

const HELP: &str = "\
Commands:
  /new              start a new chat
  /list             list chats
  /switch <n>       switch to chat n
  /rename <name>    rename the current chat
  /delete [n]       delete chat n (default: current)
  /stop             stop the pending response
  /model <id>       select a model
  /help             show this help
  /quit             exit
Anything else is sent as a message to the current chat.";

const NO_ACTIVE: &str = "No active chat. Type /new to start one.";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    New,
    List,
    Switch(usize),
    Rename(String),
    Delete(Option<usize>),
    Stop,
    Model(String),
    Help,
    Quit,
    Send(String),
    Invalid(String),
}

/// Parse one input line.
pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ReplCommand::Send(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "new" => ReplCommand::New,
        "list" | "ls" => ReplCommand::List,
        "switch" => arg.parse().map_or_else(
            |_| ReplCommand::Invalid("usage: /switch <n>".to_string()),
            ReplCommand::Switch,
        ),
        "rename" => ReplCommand::Rename(arg.to_string()),
        "delete" if arg.is_empty() => ReplCommand::Delete(None),
        "delete" => arg.parse().map_or_else(
            |_| ReplCommand::Invalid("usage: /delete [n]".to_string()),
            |n| ReplCommand::Delete(Some(n)),
        ),
        "stop" => ReplCommand::Stop,
        "model" => ReplCommand::Model(arg.to_string()),
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Invalid(format!("unknown command: /{other}")),
    }
}

/// Resolve a 1-based sidebar position.
fn session_at(view: &ChatView, position: usize) -> Option<SessionId> {
    position
        .checked_sub(1)
        .and_then(|i| view.sessions.get(i))
        .map(|entry| entry.id)
}

fn print_list(view: &ChatView) {
    if view.sessions.is_empty() {
        println!("No chats yet. Type /new to start one.");
        return;
    }
    let active = view.active.as_ref().map(|a| a.id);
    for (i, entry) in view.sessions.iter().enumerate() {
        let marker = if Some(entry.id) == active { "*" } else { " " };
        println!("{marker} {}. {}", i + 1, entry.name);
    }
    println!("  model: {}", view.selected_model);
}

fn print_active(view: &ChatView) {
    let Some(active) = &view.active else {
        println!("Welcome! Type /new to start a chat.");
        return;
    };
    println!("--- {} ---", active.name);
    for message in &active.transcript {
        println!("{}: {}", message.role(), message.content());
    }
    if !view.example_prompts.is_empty() {
        println!("Example prompts:");
        for prompt in &view.example_prompts {
            println!("  {prompt}");
        }
    }
    if view.pending {
        println!("(thinking... /stop to cancel)");
    }
}

/// Print assistant replies for the active session as they arrive.
async fn print_replies(mut updates: broadcast::Receiver<ChatView>) {
    let mut seen: Option<(SessionId, usize)> = None;
    loop {
        let view = match updates.recv().await {
            Ok(view) => view,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let Some(active) = view.active else {
            seen = None;
            continue;
        };
        let len = active.transcript.len();
        if let Some((id, previous)) = seen {
            if id == active.id && len > previous {
                for message in &active.transcript[previous..] {
                    if message.role() == MessageRole::Assistant {
                        println!("assistant: {}", message.content());
                    }
                }
            }
        }
        seen = Some((active.id, len));
    }
}

/// Run the interactive loop on stdin until `/quit` or end of input.
pub async fn run(handle: ChatHandle) -> Result<()> {
    println!("chatdesk - type /help for commands");
    let printer = tokio::spawn(print_replies(handle.subscribe()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let view = handle.view().await?;
        let active = view.active.as_ref().map(|a| a.id);

        let intent = match parse_line(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ReplCommand::List => {
                print_list(&view);
                continue;
            }
            ReplCommand::Invalid(reason) => {
                println!("{reason}");
                continue;
            }
            ReplCommand::New => Intent::CreateSession,
            ReplCommand::Model(id) => Intent::SelectModel { id },
            ReplCommand::Switch(n) => match session_at(&view, n) {
                Some(id) => Intent::SelectSession { id },
                None => {
                    println!("no chat #{n}");
                    continue;
                }
            },
            ReplCommand::Delete(n) => match n.map_or(active, |n| session_at(&view, n)) {
                Some(id) => Intent::DeleteSession { id },
                None => {
                    println!("no such chat");
                    continue;
                }
            },
            ReplCommand::Rename(name) => match active {
                Some(id) => Intent::RenameSession { id, name },
                None => {
                    println!("{NO_ACTIVE}");
                    continue;
                }
            },
            ReplCommand::Send(text) => match active {
                Some(id) => Intent::SendMessage { id, text },
                None => {
                    println!("{NO_ACTIVE}");
                    continue;
                }
            },
            ReplCommand::Stop => match active {
                Some(id) => Intent::CancelPending { id },
                None => continue,
            },
        };

        let is_send = matches!(intent, Intent::SendMessage { .. });
        let outcome = handle.dispatch(intent).await?;
        if !outcome.applied {
            if !line.trim().is_empty() {
                println!("(ignored)");
            }
        } else if !is_send {
            print_active(&outcome.view);
        }
    }

    printer.abort();
    Ok(())
}
