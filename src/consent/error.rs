use thiserror::Error;

/// Fatal consent-engine errors. None of these are recoverable: the
/// current render is aborted rather than risking a corrupted bundle.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// The column-major encoding could not be decoded.
    #[error("malformed table encoding for '{id}': {reason}")]
    MalformedFrame { id: String, reason: String },

    /// A cell referenced by the row range is missing from a column.
    #[error("table '{id}' column '{column}' is missing row {row}")]
    MissingCell {
        id: String,
        column: String,
        row: usize,
    },

    /// A row's cell count does not match the head's cell count.
    #[error("table '{id}' row {row} has {got} cells, head has {expected}")]
    ShapeMismatch {
        id: String,
        row: usize,
        got: usize,
        expected: usize,
    },

    /// An edit targeted a table id the form does not contain.
    #[error("no editable table with id '{0}'")]
    UnknownTable(String),

    /// Bundle serialization failed.
    #[error("failed to serialize donation bundle: {0}")]
    Serialize(#[from] serde_json::Error),
}
