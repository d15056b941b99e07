use crate::session::SessionId;
use crate::wire::{Command, Payload};

/// Result of driving a script to its next suspension point.
#[derive(Debug)]
pub enum ScriptStep {
    /// The script suspended and emitted a command; it will not run again
    /// until a payload is resumed into it.
    Suspend(Command),

    /// The script's top-level routine returned.
    Finished,
}

/// A suspend/resume inspection script.
///
/// The original scripts are generators: they yield a command, block until
/// a value is sent back in, and continue. Across an isolation boundary
/// there are no coroutines, so the handshake is explicit: `start` runs to
/// the first suspension, each `resume` feeds in the payload the UI
/// produced and runs to the next one.
///
/// The domain logic inside a script (what it does with the user's files)
/// is entirely its own business; the host only sees commands and
/// payloads.
pub trait DonationScript: Send {
    /// Begin the top-level routine; runs until the first suspension.
    fn start(&mut self, session_id: &SessionId) -> ScriptStep;

    /// Resume the suspended routine with the payload of the response that
    /// completed the current cycle.
    fn resume(&mut self, payload: Payload) -> ScriptStep;
}
