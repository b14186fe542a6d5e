//! minftp - a minimal interactive FTP client
//!
//! The protocol engine lives in [`session::Session`]: control channel,
//! PASV negotiation and the LIST/RETR/STOR transfers. [`terminal::Terminal`]
//! is the interactive front end used by the `minftp` binary.

pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod responses;
pub mod sanitize;
pub mod session;
pub mod terminal;
pub mod transfer;

#[cfg(test)]
mod test_server;

pub use crate::config::{CliArgs, ClientConfig};
pub use crate::error::{ClientError, Result};
pub use crate::session::{LoginReplies, Session, SessionOptions, SessionState};
pub use crate::terminal::Terminal;
