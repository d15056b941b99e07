//! Consent-table engine.
//!
//! Parses the column-major table specs carried by a consent form prompt,
//! tracks the user's edits and deletions per table, and serializes the
//! final donation bundle. This is the only component with data-integrity
//! contracts: a shape violation is fatal and a partial bundle is never
//! produced.

pub mod error;
pub mod form;
pub mod table;

pub use error::ConsentError;
pub use form::ConsentForm;
pub use table::ConsentTable;
