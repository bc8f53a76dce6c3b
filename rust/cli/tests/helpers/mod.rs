//! Shared helpers for the CLI integration tests.
//!
//! - `cli_runner`: `CliRunner` spawns the built `monkeybet` binary with
//!   piped stdin and captures stdout, stderr, and the exit code.
//!
//! ```rust,ignore
//! use crate::helpers::cli_runner::CliRunner;
//!
//! let cli = CliRunner::new().expect("cli runner");
//! let res = cli.run_with_input(&["play", "--mode", "three"], "q\n");
//! assert_eq!(res.exit_code, 0);
//! ```
pub mod cli_runner;
