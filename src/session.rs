use log::{info, warn};
use std::fmt;
use std::time::Duration;

use crate::connection::{ControlChannel, ReplyMode};
use crate::error::{ClientError, Result};
use crate::responses::{Reply, is_authentication_success};
use crate::sanitize::sanitize_input;
use crate::transfer::{self, DirectoryListing, FsStore, LocalStore, TransferReport};

/// Default FTP control port
pub const DEFAULT_PORT: u16 = 21;

/// Connection settings handed to a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Connect/read/write timeout for both channels, `None` blocks forever
    pub timeout: Option<Duration>,
    pub reply_mode: ReplyMode,
}

/// Session state as shown in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connected => write!(f, "connected"),
            SessionState::Authenticated => write!(f, "authenticated"),
        }
    }
}

enum Connection {
    Disconnected,
    Connected {
        channel: ControlChannel,
        authenticated: bool,
    },
}

/// Replies to `USER` and `PASS`
#[derive(Debug, Clone, PartialEq)]
pub struct LoginReplies {
    pub user: Option<Reply>,
    pub pass: Option<Reply>,
}

impl LoginReplies {
    /// True when the server answered either command with 230
    pub fn is_authenticated(&self) -> bool {
        [&self.user, &self.pass]
            .into_iter()
            .flatten()
            .any(|reply| reply.code().is_some_and(is_authentication_success))
    }

    pub fn replies(&self) -> impl Iterator<Item = &Reply> {
        self.user.iter().chain(self.pass.iter())
    }
}

/// An FTP client session: one server, at most one control connection
pub struct Session<S: LocalStore = FsStore> {
    host: String,
    port: u16,
    options: SessionOptions,
    store: S,
    connection: Connection,
}

impl<S: LocalStore> Session<S> {
    pub fn new(host: impl Into<String>, port: u16, options: SessionOptions, store: S) -> Self {
        Self {
            host: host.into(),
            port,
            options,
            store,
            connection: Connection::Disconnected,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        match self.connection {
            Connection::Disconnected => SessionState::Disconnected,
            Connection::Connected {
                authenticated: false,
                ..
            } => SessionState::Connected,
            Connection::Connected {
                authenticated: true,
                ..
            } => SessionState::Authenticated,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Connected { .. })
    }

    /// Open the control connection, read the greeting and switch to binary
    /// mode with `TYPE I`. Returns the replies in the order received.
    ///
    /// On failure the session stays disconnected.
    pub fn connect(&mut self) -> Result<Vec<Reply>> {
        if self.is_connected() {
            warn!("Replacing the open control connection to {}:{}", self.host, self.port);
            self.close()?;
        }

        info!("Connecting to {}:{}", self.host, self.port);
        let mut channel =
            ControlChannel::open(&self.host, self.port, self.options.timeout, self.options.reply_mode)?;

        let mut replies = Vec::new();
        replies.extend(channel.read_response()?);
        channel.send_command("TYPE I")?;
        replies.extend(channel.read_response()?);

        self.connection = Connection::Connected {
            channel,
            authenticated: false,
        };
        Ok(replies)
    }

    /// Send `USER` and `PASS`, both sanitized.
    ///
    /// A refused login is not an error; check
    /// [`LoginReplies::is_authenticated`].
    pub fn login(&mut self, user: &str, pass: &str) -> Result<LoginReplies> {
        let channel = self.channel()?;

        channel.send_command(&format!("USER {}", sanitize_input(user)))?;
        let user_reply = channel.read_response()?;
        channel.send_command(&format!("PASS {}", sanitize_input(pass)))?;
        let pass_reply = channel.read_response()?;

        let replies = LoginReplies {
            user: user_reply,
            pass: pass_reply,
        };
        let logged_in = replies.is_authenticated();
        if logged_in {
            info!("Logged in as {}", sanitize_input(user));
        } else {
            warn!("Login was not confirmed by the server");
        }
        if let Connection::Connected { authenticated, .. } = &mut self.connection {
            *authenticated = logged_in;
        }
        Ok(replies)
    }

    /// Send a raw command line; CRLF is appended
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        self.channel()?.send_command(command)
    }

    /// Read one reply from the control channel
    pub fn read_response(&mut self) -> Result<Option<Reply>> {
        self.channel()?.read_response()
    }

    /// Send a command and read its reply
    pub fn execute(&mut self, command: &str) -> Result<Option<Reply>> {
        let channel = self.channel()?;
        channel.send_command(command)?;
        channel.read_response()
    }

    pub fn list_directory(&mut self) -> Result<DirectoryListing> {
        let timeout = self.options.timeout;
        transfer::list_directory(self.channel()?, timeout)
    }

    pub fn retrieve_file(&mut self, name: &str) -> Result<TransferReport> {
        let timeout = self.options.timeout;
        let Self {
            store, connection, ..
        } = self;
        transfer::retrieve_file(connected(connection)?, timeout, &*store, name)
    }

    pub fn upload_file(&mut self, name: &str) -> Result<TransferReport> {
        let timeout = self.options.timeout;
        let Self {
            store, connection, ..
        } = self;
        transfer::upload_file(connected(connection)?, timeout, &*store, name)
    }

    pub fn change_directory(&mut self, path: &str) -> Result<Option<Reply>> {
        self.execute(&format!("CWD {}", sanitize_input(path)))
    }

    pub fn print_working_directory(&mut self) -> Result<Option<Reply>> {
        self.execute("PWD")
    }

    /// Send `QUIT`, read the goodbye and close the connection
    pub fn quit(&mut self) -> Result<Option<Reply>> {
        let reply = self.execute("QUIT");
        let closed = self.close();
        let reply = reply?;
        closed?;
        Ok(reply)
    }

    /// Close the control connection. Does nothing when already disconnected.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.connection, Connection::Disconnected) {
            Connection::Connected { channel, .. } => channel.close(),
            Connection::Disconnected => Ok(()),
        }
    }

    fn channel(&mut self) -> Result<&mut ControlChannel> {
        connected(&mut self.connection)
    }
}

fn connected(connection: &mut Connection) -> Result<&mut ControlChannel> {
    match connection {
        Connection::Connected { channel, .. } => Ok(channel),
        Connection::Disconnected => Err(ClientError::NotConnected(
            "use the session after connect".to_string(),
        )),
    }
}
