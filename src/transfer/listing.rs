//! Directory listing (LIST)

use log::{debug, info};
use std::time::Duration;

use super::progress::TransferProgress;
use super::{TransferReport, abort_transfer, open_transfer};
use crate::connection::{BUFFER_SIZE, ControlChannel};
use crate::error::Result;

/// Listing text plus the replies of the transfer
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryListing {
    pub text: String,
    pub report: TransferReport,
}

impl DirectoryListing {
    /// Non-empty lines of the listing
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim_end).filter(|line| !line.is_empty())
    }
}

/// Run `LIST` and collect whatever the server writes on the data connection
/// until it closes it.
pub fn list_directory(control: &mut ControlChannel, timeout: Option<Duration>) -> Result<DirectoryListing> {
    let transfer = open_transfer(control, timeout, "LIST")?;
    let mut data = transfer.data;

    let mut buffer = [0u8; BUFFER_SIZE];
    let mut raw = Vec::new();
    let mut progress = TransferProgress::start();

    loop {
        match data.receive(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                raw.extend_from_slice(&buffer[..n]);
                progress.add_bytes(n);
                debug!("Received {n} bytes of directory listing data");
            }
            Err(e) => return Err(abort_transfer(control, data, e)),
        }
    }
    data.close()?;

    let completion = control.read_response()?;
    let text = String::from_utf8_lossy(&raw).into_owned();
    info!("Directory listing received: {} bytes", raw.len());

    Ok(DirectoryListing {
        text,
        report: TransferReport {
            pasv: transfer.pasv,
            preliminary: transfer.preliminary,
            completion,
            bytes: progress.transferred_bytes(),
            elapsed: progress.elapsed(),
        },
    })
}
