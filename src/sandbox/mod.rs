//! The isolated script runtime.
//!
//! The inspection script runs on its own executor and communicates with
//! the engine only through JSON-serialized request/reply events; no memory
//! is shared across the boundary. [`runtime::SandboxRuntime`] is the
//! contract the engine depends on, [`worker::WorkerSandbox`] the provided
//! host that runs a [`script::DonationScript`] on a dedicated thread.

pub mod error;
pub mod mock;
pub mod protocol;
pub mod runtime;
pub mod script;
pub mod vfs;
pub mod worker;

pub use error::SandboxError;
pub use mock::MockSandbox;
pub use protocol::{ResumeEnvelope, WorkerReply, WorkerRequest};
pub use runtime::{CycleOutcome, SandboxRuntime};
pub use script::{DonationScript, ScriptStep};
pub use vfs::ScratchFs;
pub use worker::WorkerSandbox;
