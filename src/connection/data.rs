//! Passive data connections for FTP transfers

use log::{debug, error, info};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use super::control::{ControlChannel, connect_stream};
use crate::error::{ClientError, Result};
use crate::responses::{DataEndpoint, Reply, parse_pasv_reply};

/// A single-use data connection.
///
/// The only way to get one is [`DataConnection::negotiate`], so every data
/// connection is preceded by a PASV exchange on the control channel.
pub struct DataConnection {
    stream: TcpStream,
    endpoint: DataEndpoint,
}

impl DataConnection {
    /// Send `PASV`, parse the announced endpoint and connect to it.
    ///
    /// Returns the PASV reply alongside the connection so it can be shown to
    /// the operator.
    pub fn negotiate(control: &mut ControlChannel, timeout: Option<Duration>) -> Result<(Reply, Self)> {
        control.send_command("PASV")?;
        let reply = control
            .read_response()?
            .ok_or_else(|| ClientError::NoReply("PASV".to_string()))?;

        let endpoint = parse_pasv_reply(reply.text())
            .ok_or_else(|| ClientError::PasvParse(reply.to_string()))?;
        debug!("Server announced data endpoint {endpoint}");

        let connection = Self::connect(endpoint, timeout)?;
        Ok((reply, connection))
    }

    fn connect(endpoint: DataEndpoint, timeout: Option<Duration>) -> Result<Self> {
        let ip = endpoint.ip.to_string();
        let stream = connect_stream(&ip, endpoint.port, timeout).map_err(|e| {
            error!("Failed to open data connection to {endpoint}: {e}");
            ClientError::DataConnectionFailed(format!("{endpoint}: {e}"))
        })?;
        info!("Data connection opened to {endpoint}");

        Ok(Self { stream, endpoint })
    }

    pub fn endpoint(&self) -> DataEndpoint {
        self.endpoint
    }

    /// Receive up to `buffer.len()` bytes; 0 means the server closed the stream
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.stream
            .read(buffer)
            .map_err(|e| ClientError::DataConnectionFailed(format!("Failed to receive data: {e}")))
    }

    pub fn send_all(&mut self, data: &[u8]) -> Result<()> {
        self.stream
            .write_all(data)
            .map_err(|e| ClientError::DataConnectionFailed(format!("Failed to send data: {e}")))
    }

    /// Close both directions. The server takes this as end of upload.
    pub fn close(self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(ClientError::Io(e)),
            _ => {
                debug!("Data connection to {} closed", self.endpoint);
                Ok(())
            }
        }
    }
}
