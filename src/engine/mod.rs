//! Session orchestration.
//!
//! [`processing::ProcessingEngine`] owns one session's lifecycle and
//! drives the sandbox through run cycles; [`router::CommandRouter`]
//! interprets each emitted command and turns the eventual user action
//! back into the response that resumes the next cycle. The UI and the
//! submission target plug in behind the [`visualisation::VisualisationEngine`]
//! and [`sink::DonationSink`] seams.

pub mod error;
pub mod processing;
pub mod router;
pub mod sink;
pub mod visualisation;

pub use error::EngineError;
pub use processing::{EngineState, ProcessingEngine};
pub use router::{CommandRouter, PageResolver};
pub use sink::{DirectorySink, DonationSink, MemorySink};
pub use visualisation::{HeadlessVisualisation, VisualisationEngine};
