//! Operator command definitions

use std::fmt;

/// Commands typed at the `ftp>` prompt
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    /// get <name> - download a file (RETR)
    Get(String),

    /// put <name> - upload a file (STOR)
    Put(String),

    /// dir / list - list the remote directory (LIST)
    List,

    /// cd <path> - change remote directory (CWD)
    Cd(String),

    /// pwd - print remote directory (PWD)
    Pwd,

    /// help - show available commands (client-side only)
    Help,

    /// quit - send QUIT and exit
    Quit,

    /// Anything else, sent to the server as typed with the verb uppercased
    Passthrough(String),

    /// Recognized command with missing arguments
    Invalid(String),
}

impl fmt::Display for OperatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorCommand::Get(name) => write!(f, "get {name}"),
            OperatorCommand::Put(name) => write!(f, "put {name}"),
            OperatorCommand::List => write!(f, "list"),
            OperatorCommand::Cd(path) => write!(f, "cd {path}"),
            OperatorCommand::Pwd => write!(f, "pwd"),
            OperatorCommand::Help => write!(f, "help"),
            OperatorCommand::Quit => write!(f, "quit"),
            OperatorCommand::Passthrough(line) if line.starts_with("PASS ") => {
                write!(f, "PASS [hidden]")
            }
            OperatorCommand::Passthrough(line) => write!(f, "{line}"),
            OperatorCommand::Invalid(msg) => write!(f, "invalid ({msg})"),
        }
    }
}
