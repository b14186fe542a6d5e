//! Help text for operator commands

/// Returns the help text for all operator commands
pub fn get_help_text() -> &'static str {
    "Available commands:
  get <filename>    - Download file from server (RETR)
  put <filename>    - Upload file to server (STOR)
  dir, list         - List directory contents (LIST)
  cd <directory>    - Change working directory (CWD)
  pwd               - Print working directory (PWD)
  help              - Show this help message
  quit              - Send QUIT, disconnect and exit

Any other command is sent to the server as typed, with the verb
uppercased (for example `syst`, `noop`, `mkd <dir>`).
Transfers always use passive mode (PASV) and binary type (TYPE I)."
}
