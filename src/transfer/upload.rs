//! File upload (STOR)

use log::{debug, info};
use std::io::Read;
use std::time::Duration;

use super::progress::TransferProgress;
use super::store::LocalStore;
use super::{TransferReport, abort_transfer, open_transfer};
use crate::connection::{BUFFER_SIZE, ControlChannel};
use crate::error::{ClientError, Result};
use crate::sanitize::sanitize_input;

/// Upload the local file `name`.
///
/// Only the remote name in the `STOR` line is sanitized; the local file is
/// opened under the name the operator typed.
pub fn upload_file<S: LocalStore>(
    control: &mut ControlChannel,
    timeout: Option<Duration>,
    store: &S,
    name: &str,
) -> Result<TransferReport> {
    let safe_name = sanitize_input(name);
    let command = format!("STOR {safe_name}");
    let transfer = open_transfer(control, timeout, &command)?;
    let mut data = transfer.data;

    let mut source = match store.open(name) {
        Ok(source) => source,
        Err(e) => {
            let err = ClientError::local_io(name, e);
            return Err(abort_transfer(control, data, err));
        }
    };

    info!("Starting upload of '{name}' as '{safe_name}'");
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut progress = TransferProgress::start();

    loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                let err = ClientError::local_io(name, e);
                return Err(abort_transfer(control, data, err));
            }
        };
        if let Err(e) = data.send_all(&buffer[..n]) {
            return Err(abort_transfer(control, data, e));
        }
        progress.add_bytes(n);
    }
    debug!("Reached end of local file, {} bytes sent", progress.transferred_bytes());

    drop(source);
    data.close()?;

    let completion = control.read_response()?;
    info!(
        "Upload of '{safe_name}' finished: {} bytes in {:?}",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ReplyMode;
    use crate::test_server::{StubConn, StubServer};
    use crate::transfer::FsStore;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("minftp-stor-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn control_for(server: &StubServer) -> ControlChannel {
        ControlChannel::open("127.0.0.1", server.port(), None, ReplyMode::Complete).unwrap()
    }

    #[test]
    fn test_upload_file() {
        let dir = scratch_dir("upload");
        let content: Vec<u8> = (0..3000u32).map(|i| (i % 7) as u8).collect();
        fs::write(dir.join("notes.txt"), &content).unwrap();

        let server = StubServer::spawn(|conn| {
            let listener = conn.passive();
            conn.expect("STOR notes.txt");
            conn.reply("150 Ok to send data");
            let received = StubConn::receive_data(&listener);
            conn.reply(&format!("226 Received {} bytes", received.len()));
        });
        let store = FsStore::new(&dir);
        let mut control = control_for(&server);

        let report = upload_file(&mut control, None, &store, "notes.txt").unwrap();
        server.join();

        assert_eq!(report.bytes, 3000);
        assert_eq!(report.completion.unwrap().to_string(), "226 Received 3000 bytes");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_upload_uses_unsanitized_local_name() {
        let dir = scratch_dir("local-name");
        fs::write(dir.join("my file.txt"), b"spaced").unwrap();

        let server = StubServer::spawn(|conn| {
            let listener = conn.passive();
            conn.expect("STOR myfile.txt");
            conn.reply("150 Ok to send data");
            assert_eq!(StubConn::receive_data(&listener), b"spaced");
            conn.reply("226 Transfer complete");
        });
        let store = FsStore::new(&dir);
        let mut control = control_for(&server);

        let report = upload_file(&mut control, None, &store, "my file.txt").unwrap();
        server.join();

        assert_eq!(report.bytes, 6);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_upload_missing_local_file_keeps_channel_in_step() {
        let dir = scratch_dir("missing");
        let server = StubServer::spawn(|conn| {
            let listener = conn.passive();
            conn.expect("STOR ghost.txt");
            conn.reply("150 Ok to send data");
            assert_eq!(StubConn::receive_data(&listener), b"");
            conn.reply("226 Transfer complete");
            conn.expect("PWD");
            conn.reply("257 \"/\"");
        });
        let store = FsStore::new(&dir);
        let mut control = control_for(&server);

        let err = upload_file(&mut control, None, &store, "ghost.txt").unwrap_err();
        assert!(matches!(err, ClientError::LocalIo { .. }));

        // the 226 was drained, so the next reply belongs to PWD
        control.send_command("PWD").unwrap();
        let reply = control.read_response().unwrap().unwrap();
        assert_eq!(reply.code(), Some(257));
        server.join();
        fs::remove_dir_all(dir).unwrap();
    }
}
