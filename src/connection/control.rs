//! Control channel for the minftp client
//!
//! Owns the TCP stream that carries command lines and server replies.

use log::{debug, info, trace, warn};
use serde::Deserialize;
use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::responses::{Reply, complete_reply_len, decode_reply};

/// Receive buffer used for every read on the control and data channels
pub const BUFFER_SIZE: usize = 1024;

/// Longest reply buffered in [`ReplyMode::Complete`] before giving up
pub const MAX_REPLY_LEN: usize = 64 * BUFFER_SIZE;

/// How a logical reply is cut out of the control stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// One read of up to [`BUFFER_SIZE`] bytes is one reply. Multi-line or
    /// long replies may come back truncated or split across calls.
    Single,
    /// Keep reading until a whole single-line or `ddd-` block reply is
    /// buffered. A reply that grows past [`MAX_REPLY_LEN`] without its
    /// terminating line is an error.
    #[default]
    Complete,
}

impl fmt::Display for ReplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyMode::Single => write!(f, "single"),
            ReplyMode::Complete => write!(f, "complete"),
        }
    }
}

/// Open a TCP stream to the first reachable address of `host:port`
pub(crate) fn connect_stream(host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| ClientError::InvalidHost(format!("{host}: {e}")))?
        .collect();

    let mut last_err = None;
    for addr in &addrs {
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                stream.set_read_timeout(timeout)?;
                stream.set_write_timeout(timeout)?;
                return Ok(stream);
            }
            Err(e) => {
                debug!("Connection to {addr} failed: {e}");
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
            ClientError::ConnectionRefused(format!("{host}:{port}"))
        }
        Some(e) => ClientError::Io(e),
        None => ClientError::InvalidHost(format!("{host} did not resolve to any address")),
    })
}

/// The FTP control connection
pub struct ControlChannel {
    stream: TcpStream,
    peer: SocketAddr,
    mode: ReplyMode,
    pending: Vec<u8>,
}

impl ControlChannel {
    /// Connect to the server. Does not read the greeting.
    pub fn open(host: &str, port: u16, timeout: Option<Duration>, mode: ReplyMode) -> Result<Self> {
        let stream = connect_stream(host, port, timeout)?;
        let peer = stream.peer_addr()?;
        info!("Control connection established with {peer}");

        Ok(Self {
            stream,
            peer,
            mode,
            pending: Vec::with_capacity(BUFFER_SIZE),
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn reply_mode(&self) -> ReplyMode {
        self.mode
    }

    /// Send one command line. CRLF is appended here and only here.
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        if command.starts_with("PASS ") {
            debug!("CC OUT: PASS ****");
        } else {
            debug!("CC OUT: {command}");
        }

        let line = format!("{command}\r\n");
        self.stream
            .write_all(line.as_bytes())
            .and_then(|_| self.stream.flush())
            .map_err(lost_or_io)
    }

    /// Read one logical reply. `None` when the server closed the connection
    /// or sent bytes that are not UTF-8.
    pub fn read_response(&mut self) -> Result<Option<Reply>> {
        let reply = match self.mode {
            ReplyMode::Single => self.read_single()?,
            ReplyMode::Complete => self.read_complete()?,
        };
        match &reply {
            Some(reply) => debug!("CC IN: {reply}"),
            None => debug!("CC IN: no reply"),
        }
        Ok(reply)
    }

    fn read_single(&mut self) -> Result<Option<Reply>> {
        if !self.pending.is_empty() {
            let bytes = std::mem::take(&mut self.pending);
            return Ok(decode_reply(&bytes));
        }

        let mut buffer = [0u8; BUFFER_SIZE];
        let n = self.stream.read(&mut buffer).map_err(lost_or_io)?;
        Ok(decode_reply(&buffer[..n]))
    }

    fn read_complete(&mut self) -> Result<Option<Reply>> {
        loop {
            if let Some(len) = complete_reply_len(&self.pending) {
                let bytes: Vec<u8> = self.pending.drain(..len).collect();
                return Ok(decode_reply(&bytes));
            }

            if self.fill()? == 0 {
                // peer closed, hand out whatever partial reply is left
                let bytes = std::mem::take(&mut self.pending);
                return Ok(decode_reply(&bytes));
            }

            if self.pending.len() > MAX_REPLY_LEN {
                warn!("Discarding {} bytes of unterminated reply", self.pending.len());
                self.pending.clear();
                return Err(ClientError::ReplyTooLong(MAX_REPLY_LEN));
            }
        }
    }

    fn fill(&mut self) -> Result<usize> {
        let mut buffer = [0u8; BUFFER_SIZE];
        let n = self.stream.read(&mut buffer).map_err(lost_or_io)?;
        trace!("Read {n} bytes from control channel");
        self.pending.extend_from_slice(&buffer[..n]);
        Ok(n)
    }

    /// Shut down both directions of the connection
    pub fn close(self) -> Result<()> {
        info!("Closing control connection with {}", self.peer);
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(ClientError::Io(e)),
            _ => Ok(()),
        }
    }
}

fn lost_or_io(e: io::Error) -> ClientError {
    match e.kind() {
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset => ClientError::ConnectionLost(e.to_string()),
        _ => ClientError::Io(e),
    }
}
