//! Operator commands
//!
//! This module defines the commands accepted at the prompt and their parsing.

pub mod command;
pub mod help;
pub mod parser;

// Re-export the main types for easier importing
pub use command::OperatorCommand;
pub use help::get_help_text;
pub use parser::parse_command;
