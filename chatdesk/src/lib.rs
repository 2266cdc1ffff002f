//! Chatdesk - session and message-exchange state for a chat interface.
//!
//! Architecture:
//! - `ChatEngine` owns every session, the active selection and the pending
//!   response of each session; it never fails, invalid intents are ignored
//! - The response simulator is the seam a real backend would replace
//! - `runtime` runs the engine on a single task; adapters (`server`, `repl`)
//!   talk to it through a cloneable `ChatHandle`

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod repl;
pub mod runtime;
pub mod sequencer;
pub mod server;
pub mod simulator;
pub mod store;
pub mod view;
