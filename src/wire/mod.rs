//! Shared wire vocabulary for the engine, the sandbox, and the UI.
//!
//! Everything in this module is a plain serde-serializable value. Commands
//! travel out of the sandbox, payloads travel back in, and pages describe
//! what the UI must display in between.

pub mod command;
pub mod page;
pub mod table;

pub use command::{Command, FileRef, Payload, PromptHandle, Response};
pub use page::{
    ConfirmPrompt, ConsentFormPrompt, DonationPage, FileInputPrompt, Page, PageFooter, PageHeader,
    PromptBody, Translatable,
};
pub use table::TableSpec;
