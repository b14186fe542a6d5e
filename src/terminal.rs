//! Terminal module for the minftp client
//!
//! Handles user interaction and maps prompt commands onto session calls.

use log::{debug, error, info};
use std::io::{BufRead, Write};

use crate::commands::{OperatorCommand, get_help_text, parse_command};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::responses::Reply;
use crate::session::Session;
use crate::transfer::{FsStore, LocalStore, TransferReport, format_bytes, format_speed};

/// Terminal handler for interactive FTP sessions
pub struct Terminal<S: LocalStore = FsStore> {
    session: Session<S>,
    config: ClientConfig,
}

impl<S: LocalStore> Terminal<S> {
    /// Create a new terminal with the given session and config
    pub fn new(session: Session<S>, config: ClientConfig) -> Self {
        info!("Creating terminal session for server: {}", config.display_name());
        Self { session, config }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Run the interactive session: connect, log in, then serve the prompt
    /// until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        writeln!(out, "minftp - {}", self.config.display_name())?;

        match self.session.connect() {
            Ok(replies) => print_replies(&mut out, &replies)?,
            Err(e) => {
                error!("Connection failed: {e}");
                writeln!(out, "Connection failed: {e}")?;
                writeln!(out, "Continuing in disconnected mode...")?;
            }
        }

        if self.session.is_connected() {
            self.prompt_login(&mut input, &mut out)?;
        }

        loop {
            write!(out, "ftp> ")?;
            out.flush()?;

            let Some(line) = read_line(&mut input)? else {
                break;
            };
            let line = line.trim();
            if line.chars().count() > self.config.max_command_length {
                writeln!(
                    out,
                    "Command too long. Limit input to {} characters.",
                    self.config.max_command_length
                )?;
                continue;
            }
            let Some(command) = parse_command(line) else {
                continue;
            };
            debug!("User entered command: {command}");

            match self.handle_command(command, &mut out) {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => {
                    error!("Command failed: {e}");
                    writeln!(out, "Error: {e}")?;
                }
            }
        }

        // end of input behaves like quit
        self.quit(&mut out)
    }

    fn prompt_login<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        let limit = self.config.max_credential_length;

        write!(out, "Enter username: ")?;
        out.flush()?;
        let Some(user) = read_line(input)? else {
            return Ok(());
        };
        if user.chars().count() > limit {
            writeln!(out, "Username longer than {limit} characters, skipping login.")?;
            return Ok(());
        }

        write!(out, "Enter password: ")?;
        out.flush()?;
        let Some(pass) = read_line(input)? else {
            return Ok(());
        };
        if pass.chars().count() > limit {
            writeln!(out, "Password longer than {limit} characters, skipping login.")?;
            return Ok(());
        }

        match self.session.login(&user, &pass) {
            Ok(replies) => {
                for reply in replies.replies() {
                    writeln!(out, "{reply}")?;
                }
                if !replies.is_authenticated() {
                    writeln!(out, "Login not confirmed by the server.")?;
                }
            }
            Err(e) => writeln!(out, "Login failed: {e}")?,
        }
        Ok(())
    }

    /// Run one command. Returns `false` when the session should end.
    fn handle_command<W: Write>(&mut self, command: OperatorCommand, out: &mut W) -> Result<bool> {
        match command {
            OperatorCommand::Quit => {
                self.quit(out)?;
                return Ok(false);
            }
            OperatorCommand::Help => {
                writeln!(out, "{}", get_help_text())?;
                writeln!(out, "Current server: {}", self.config.display_name())?;
                writeln!(out, "Current state: {}", self.session.state())?;
                writeln!(out, "Local directory: {}", self.config.local_directory)?;
            }
            OperatorCommand::Invalid(msg) => writeln!(out, "Error: {msg}")?,
            OperatorCommand::Get(name) => {
                let report = self.session.retrieve_file(&name)?;
                print_report(out, &report, "Download", &name)?;
            }
            OperatorCommand::Put(name) => {
                let report = self.session.upload_file(&name)?;
                print_report(out, &report, "Upload", &name)?;
            }
            OperatorCommand::List => {
                let listing = self.session.list_directory()?;
                let replies = listing.report.replies();
                writeln!(out, "{}", replies[0])?;
                writeln!(out, "{}", replies[1])?;
                if listing.entries().next().is_none() {
                    writeln!(out, "Directory is empty.")?;
                }
                for entry in listing.entries() {
                    writeln!(out, "{entry}")?;
                }
                if let Some(reply) = replies.get(2) {
                    writeln!(out, "{reply}")?;
                }
            }
            OperatorCommand::Cd(path) => {
                let reply = self.session.change_directory(&path)?;
                print_replies(out, reply.as_slice())?;
            }
            OperatorCommand::Pwd => {
                let reply = self.session.print_working_directory()?;
                print_replies(out, reply.as_slice())?;
            }
            OperatorCommand::Passthrough(line) => {
                let reply = self.session.execute(&line)?;
                print_replies(out, reply.as_slice())?;
            }
        }
        Ok(true)
    }

    /// Send QUIT if connected. The session is closed even when QUIT fails;
    /// the failure is printed and the caller still ends.
    fn quit<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if !self.session.is_connected() {
            return Ok(());
        }
        match self.session.quit() {
            Ok(reply) => print_replies(out, reply.as_slice()),
            Err(e) => {
                error!("QUIT failed: {e}");
                writeln!(out, "Error: {e}")?;
                Ok(())
            }
        }
    }
}

/// Read one line without its terminator; `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn print_replies<W: Write>(out: &mut W, replies: &[Reply]) -> Result<()> {
    for reply in replies {
        writeln!(out, "{reply}")?;
    }
    Ok(())
}

fn print_report<W: Write>(out: &mut W, report: &TransferReport, what: &str, name: &str) -> Result<()> {
    for reply in report.replies() {
        writeln!(out, "{reply}")?;
    }
    writeln!(
        out,
        "{what} completed: {name} ({}, {})",
        format_bytes(report.bytes),
        format_speed(report.bytes, report.elapsed)
    )?;
    Ok(())
}
