//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod inputs;
pub mod list_tools;
pub mod output;
