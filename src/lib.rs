//! datapledge: a local data-donation flow engine.
//!
//! A sandboxed inspection script walks the user through a guided,
//! multi-step dialogue over their own data exports; the user reviews and
//! edits what was derived, and only the consented bundle leaves the
//! machine. The crate provides the session engine, the command/payload
//! wire contract, the sandbox worker host, and the consent-table
//! edit/serialize engine; rendering plugs in behind the
//! [`engine::VisualisationEngine`] seam.

pub mod config;
pub mod consent;
pub mod engine;
pub mod flows;
pub mod sandbox;
pub mod session;
pub mod util;
pub mod wire;

pub use config::Config;
pub use consent::{ConsentError, ConsentForm, ConsentTable};
pub use engine::{
    CommandRouter, DirectorySink, DonationSink, EngineError, EngineState, HeadlessVisualisation,
    MemorySink, PageResolver, ProcessingEngine, VisualisationEngine,
};
pub use sandbox::{
    CycleOutcome, DonationScript, MockSandbox, SandboxError, SandboxRuntime, ScriptStep,
    WorkerSandbox,
};
pub use session::{Session, SessionId};
pub use wire::{Command, FileRef, Page, Payload, PromptHandle, Response, TableSpec};
