use thiserror::Error;

/// Errors surfaced by a sandbox runtime.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// `initialise` was called a second time. Bootstrap runs exactly once.
    #[error("sandbox already initialised")]
    AlreadyInitialised,

    /// A cycle was requested before `initialise` completed.
    #[error("sandbox not initialised")]
    NotInitialised,

    /// `resume` was called while no suspended cycle was waiting for a
    /// value. Protocol violation on the caller's side.
    #[error("no suspended cycle to resume")]
    NoPendingCycle,

    /// `start` was called a second time within the same session.
    #[error("script already started")]
    AlreadyStarted,

    /// The script failed or panicked inside the worker.
    #[error("script failed: {0}")]
    ScriptFailed(String),

    /// The worker replied with an event the protocol does not allow at
    /// this point.
    #[error("protocol violation from worker: {0}")]
    Protocol(String),

    /// The worker went away (thread exited or channels closed).
    #[error("sandbox worker disconnected")]
    Disconnected,

    /// Spawning the worker or mounting a file into its filesystem failed.
    #[error("sandbox i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// A message could not be serialized across the isolation boundary.
    #[error("failed to encode message across sandbox boundary: {0}")]
    Codec(#[from] serde_json::Error),
}
