//! File download (RETR)

use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Duration;

use super::progress::TransferProgress;
use super::store::LocalStore;
use super::{TransferReport, abort_transfer, open_transfer};
use crate::connection::{BUFFER_SIZE, ControlChannel};
use crate::error::{ClientError, Result};
use crate::sanitize::sanitize_input;

/// Download `name` into the local store.
///
/// The local file is created before the first byte arrives, so an empty
/// remote file gives an empty local file. A download that fails midway
/// leaves the partial local file in place.
pub fn retrieve_file<S: LocalStore>(
    control: &mut ControlChannel,
    timeout: Option<Duration>,
    store: &S,
    name: &str,
) -> Result<TransferReport> {
    let safe_name = sanitize_input(name);
    let command = format!("RETR {safe_name}");
    let transfer = open_transfer(control, timeout, &command)?;
    let mut data = transfer.data;

    info!("Starting download of '{safe_name}'");
    let sink = match store.create(&safe_name) {
        Ok(sink) => sink,
        Err(e) => {
            let err = ClientError::local_io(&safe_name, e);
            return Err(abort_transfer(control, data, err));
        }
    };

    let mut writer = BufWriter::new(sink);
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut progress = TransferProgress::start();

    loop {
        let n = match data.receive(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return Err(abort_transfer(control, data, e)),
        };
        if let Err(e) = writer.write_all(&buffer[..n]) {
            let err = ClientError::local_io(&safe_name, e);
            return Err(abort_transfer(control, data, err));
        }
        progress.add_bytes(n);
    }
    debug!("Reached end of data, {} bytes received", progress.transferred_bytes());

    if let Err(e) = writer.flush() {
        let err = ClientError::local_io(&safe_name, e);
        return Err(abort_transfer(control, data, err));
    }
    drop(writer);
    data.close()?;

    let completion = control.read_response()?;
    info!(
        "Download of '{safe_name}' finished: {} bytes in {:?}",
        progress.transferred_bytes(),
        progress.elapsed()
    );

    Ok(TransferReport {
        pasv: transfer.pasv,
        preliminary: transfer.preliminary,
        completion,
        bytes: progress.transferred_bytes(),
        elapsed: progress.elapsed(),
    })
}
