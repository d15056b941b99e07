use thiserror::Error;

use crate::sandbox::SandboxError;

/// Fatal engine errors. A protocol violation signals a programming
/// defect, not a data-safety issue; the session stalls and is not
/// silently recovered.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// The visualisation dropped its end of the response channel while a
    /// page was still waiting to be resolved.
    #[error("visualisation disconnected before resolving the current page")]
    VisualisationGone,

    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}
