//! Command trait definition for CLI commands.
//!
//! Every fgbamdiff subcommand implements [`Command`]; `enum_dispatch` forwards calls from the
//! subcommand enum in `main` without dynamic dispatch.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all fgbamdiff CLI commands.
///
/// `command_line` is the full invocation, for commands that record it.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
