use serde::{Deserialize, Serialize};

use crate::session::SessionId;
use crate::wire::{Command, Payload};

/// Requests sent into the worker. Every request crosses the isolation
/// boundary as a JSON event object; unknown events are rejected by the
/// worker rather than guessed at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WorkerRequest {
    /// One-time bootstrap: load the script package and set up the scratch
    /// filesystem.
    Initialise,

    /// Begin the script's top-level routine for a session.
    FirstRunCycle { session_id: SessionId },

    /// Resume the suspended routine with the response to the previous
    /// cycle's command.
    NextRunCycle { response: ResumeEnvelope },
}

/// Wire envelope around the value resumed into the script. The response
/// object crosses the boundary; only its payload reaches the script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumeEnvelope {
    pub payload: Payload,
}

/// Replies emitted by the worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WorkerReply {
    /// Bootstrap complete; cycles may begin.
    InitialiseDone,

    /// The script suspended on a command.
    RunCycleDone { command: Command },

    /// The script's top-level routine returned.
    ScriptDone,

    /// The script failed or the request could not be honored.
    ScriptFailed { error: String },
}
