//! # Direct API Server
//!
//! A minimal tool server speaking a JSON-RPC style protocol over plain HTTP
//! request/response (no streaming).
//!
//! This crate provides:
//! - A session store with an explicit registration step
//! - A dispatcher enforcing the per-session `initialize` handshake
//! - A tool registry with a single built-in tool, `fetchWebsite`
//! - An axum router exposing `/register`, `/api/message`, `/status`, `/health` and `/`
//!
//! ## Architecture
//!
//! ```text
//! HTTP (api) ──> Dispatcher ──> SessionStore
//!                    │
//!                    └────────> ToolRegistry ──> WebsiteFetcher
//! ```
//!
//! The HTTP layer only decodes envelopes and resolves the session id; all
//! protocol rules live in [`dispatcher`].

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod tools;

pub use api::{AppState, create_router, serve};
pub use config::ServerConfig;
pub use dispatcher::Dispatcher;
pub use error::{Result, ServerError};
pub use session::{Session, SessionStore};
pub use tools::{Tool, ToolError, ToolRegistry, WebsiteFetcher};
