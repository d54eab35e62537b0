//! HTTP API module.
//!
//! Server, request/response types and the log broadcaster used across the
//! pipeline.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, AppState};
pub use types::*;
