//! Data transfers: LIST, RETR and STOR
//!
//! Every transfer runs the same phases in strict order on one thread:
//! PASV and data connection, transfer command and its preliminary reply,
//! payload over the data connection, completion reply.

pub mod download;
pub mod listing;
pub mod progress;
pub mod store;
pub mod upload;

use log::{debug, warn};
use std::time::Duration;

use crate::connection::{ControlChannel, DataConnection};
use crate::error::{ClientError, Result};
use crate::responses::Reply;

// Re-export main functions
pub use download::retrieve_file;
pub use listing::{DirectoryListing, list_directory};
pub use progress::{TransferProgress, format_bytes, format_speed};
pub use store::{FsStore, LocalStore};
pub use upload::upload_file;

/// Replies and counters collected during one transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReport {
    /// Reply to `PASV`
    pub pasv: Reply,
    /// First reply to the transfer command, usually 150
    pub preliminary: Reply,
    /// Reply read after the data connection was closed, usually 226
    pub completion: Option<Reply>,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl TransferReport {
    /// Every reply of the transfer, in the order they were received
    pub fn replies(&self) -> Vec<&Reply> {
        let mut replies = vec![&self.pasv, &self.preliminary];
        replies.extend(self.completion.as_ref());
        replies
    }
}

/// Data connection plus the replies of the opening phases
pub(crate) struct OpenTransfer {
    pub pasv: Reply,
    pub preliminary: Reply,
    pub data: DataConnection,
}

/// Negotiate the data connection, send `command` and read its first reply.
///
/// A 4xx/5xx first reply means no payload and no completion reply will
/// follow, so the data connection is dropped and the transfer rejected.
pub(crate) fn open_transfer(
    control: &mut ControlChannel,
    timeout: Option<Duration>,
    command: &str,
) -> Result<OpenTransfer> {
    let (pasv, data) = DataConnection::negotiate(control, timeout)?;

    control.send_command(command)?;
    let preliminary = control
        .read_response()?
        .ok_or_else(|| ClientError::NoReply(command.to_string()))?;

    if preliminary.is_error() {
        warn!("Server refused {command}: {preliminary}");
        if let Err(e) = data.close() {
            debug!("Failed to close data connection after refused {command}: {e}");
        }
        return Err(ClientError::Rejected {
            command: command.to_string(),
            reply: preliminary,
        });
    }

    Ok(OpenTransfer {
        pasv,
        preliminary,
        data,
    })
}

/// Give up on a transfer after the server accepted it: close the data
/// connection and consume the completion reply so the control channel stays
/// in step. Returns `err` unchanged.
pub(crate) fn abort_transfer(
    control: &mut ControlChannel,
    data: DataConnection,
    err: ClientError,
) -> ClientError {
    if let Err(e) = data.close() {
        debug!("Failed to close data connection of aborted transfer: {e}");
    }
    match control.read_response() {
        Ok(Some(reply)) => debug!("Reply after aborted transfer: {reply}"),
        Ok(None) => debug!("No reply after aborted transfer"),
        Err(e) => debug!("Failed to read reply after aborted transfer: {e}"),
    }
    err
}
