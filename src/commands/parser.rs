//! Command parsing functionality

use super::OperatorCommand;

/// Parse one line typed at the prompt. `None` for a blank line.
pub fn parse_command(input: &str) -> Option<OperatorCommand> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();

    let command = match verb.to_lowercase().as_str() {
        "get" => with_arg(arg, OperatorCommand::Get, "get requires a file name"),
        "put" => with_arg(arg, OperatorCommand::Put, "put requires a file name"),
        "cd" => with_arg(arg, OperatorCommand::Cd, "cd requires a directory"),
        "dir" | "list" => OperatorCommand::List,
        "pwd" => OperatorCommand::Pwd,
        "help" | "?" => OperatorCommand::Help,
        "quit" | "exit" | "bye" => OperatorCommand::Quit,
        _ if arg.is_empty() => OperatorCommand::Passthrough(verb.to_uppercase()),
        _ => OperatorCommand::Passthrough(format!("{} {arg}", verb.to_uppercase())),
    };
    Some(command)
}

fn with_arg(arg: &str, build: fn(String) -> OperatorCommand, missing: &str) -> OperatorCommand {
    if arg.is_empty() {
        OperatorCommand::Invalid(missing.to_string())
    } else {
        build(arg.to_string())
    }
}
