//! Exit code constants for the CLI application.

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// General error exit code.
pub const ERROR: i32 = 2;

/// Interrupted before finishing (e.g. a capped simulation run).
pub const INTERRUPTED: i32 = 130;
