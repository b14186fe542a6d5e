//! Connection management for the minftp client
//!
//! Handles both the control connection and the passive data connections.

pub mod control;
pub mod data;

// Re-export main types
pub use control::{BUFFER_SIZE, ControlChannel, MAX_REPLY_LEN, ReplyMode};
pub use data::DataConnection;
