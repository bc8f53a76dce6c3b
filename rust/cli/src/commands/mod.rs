//! Command handler modules for the monkeybet CLI.
//!
//! Each command lives in its own file with the same shape:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Module-private helpers for that command
//! - Output streams (`&mut dyn Write`) passed in, so tests capture them
//! - Errors propagated via the `CliError` enum

mod cfg;
mod play;
mod sim;

pub use cfg::handle_cfg_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;
