use serde::{Deserialize, Serialize};

use crate::wire::page::Translatable;

/// Table shipped by the sandbox for consent review.
///
/// `data_frame` holds the column-major encoding as JSON text: a map from
/// column name to a map from row-index-string to cell value. Key order is
/// the column order. Each column carries one sentinel key past the last
/// real row index, so the row count is the first column's key count minus
/// one; see the consent engine for the decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSpec {
    pub id: String,
    pub title: Translatable,
    pub data_frame: String,
}

impl TableSpec {
    pub fn new(
        id: impl Into<String>,
        title: Translatable,
        data_frame: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title,
            data_frame: data_frame.into(),
        }
    }

    /// Encode head and rows into the column-major wire form, including the
    /// sentinel key each column carries past its last row.
    pub fn encode_frame(head: &[String], rows: &[Vec<String>]) -> String {
        let mut frame = serde_json::Map::new();
        for (column_index, column_name) in head.iter().enumerate() {
            let mut column = serde_json::Map::new();
            for (row_index, row) in rows.iter().enumerate() {
                let cell = row
                    .get(column_index)
                    .cloned()
                    .unwrap_or_default();
                column.insert(row_index.to_string(), serde_json::Value::String(cell));
            }
            column.insert(rows.len().to_string(), serde_json::Value::Null);
            frame.insert(column_name.clone(), serde_json::Value::Object(column));
        }
        serde_json::Value::Object(frame).to_string()
    }
}
