//! Server errors

use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Errors raised while standing the server up or tearing it down
///
/// Per-request failures are not represented here; they are answered on the
/// requesting connection and never surface from the serve loop.
#[derive(ThisError, Debug)]
pub enum Error {
    /// The base directory is missing or not a directory
    #[error("base directory {} does not exist or is not a directory", .path.display())]
    Directory { path: PathBuf },

    /// The listening socket could not be bound
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    /// The listening socket is already held
    #[error("the server is already running")]
    AlreadyRunning,

    /// A thread panicked while it held the server state
    #[error("server state poisoned by a panicked thread")]
    Poisoned,
}
