use async_trait::async_trait;

use crate::sandbox::error::SandboxError;
use crate::session::SessionId;
use crate::wire::{Command, Payload};

/// Outcome of one run cycle: the script either suspended on a command or
/// its top-level routine returned.
#[derive(Debug)]
pub enum CycleOutcome {
    Suspended(Command),
    Finished,
}

/// Contract the processing engine depends on.
///
/// Implementations own the isolated executor the script runs on; every
/// method call translates to message passing across that boundary. The
/// engine guarantees strict alternation (one cycle in flight at a time);
/// implementations still reject out-of-order calls instead of queueing
/// them, because a suspended routine has exactly one valid continuation
/// point.
#[async_trait]
pub trait SandboxRuntime: Send {
    /// One-time bootstrap: load the runtime, its libraries, and the
    /// script package. Must complete exactly once before any cycle; a
    /// second call fails with [`SandboxError::AlreadyInitialised`].
    async fn initialise(&mut self) -> Result<(), SandboxError>;

    /// Begin the script's top-level routine; runs until the first
    /// suspension (or completion, for a script that never suspends).
    async fn start(&mut self, session_id: SessionId) -> Result<CycleOutcome, SandboxError>;

    /// Send a value into the currently suspended routine and run until
    /// the next suspension or completion.
    ///
    /// Fails with [`SandboxError::NoPendingCycle`] if no cycle is
    /// pending. A `file` payload is first made reachable inside the
    /// sandbox's filesystem at a fresh, collision-free path; the script
    /// receives that path, not the file.
    async fn resume(&mut self, payload: Payload) -> Result<CycleOutcome, SandboxError>;
}
