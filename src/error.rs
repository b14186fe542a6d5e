use thiserror::Error;

use crate::responses::Reply;

/// Main error type for the minftp client
#[derive(Debug, Error)]
pub enum ClientError {
    // Connection Errors
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),
    #[error("Invalid host: {0}")]
    InvalidHost(String),
    #[error("Not connected: {0}")]
    NotConnected(String),
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
    #[error("Data connection failed: {0}")]
    DataConnectionFailed(String),

    // Protocol Errors
    #[error("No reply from server to {0}")]
    NoReply(String),
    #[error("Failed to parse PASV reply: {0}")]
    PasvParse(String),
    #[error("Reply longer than {0} bytes without a closing line")]
    ReplyTooLong(usize),
    #[error("Server rejected {command}: {reply}")]
    Rejected { command: String, reply: Reply },

    // Local file errors
    #[error("Local file '{path}': {source}")]
    LocalIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn local_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ClientError>;
