use serde_json::Value;

use crate::consent::error::ConsentError;
use crate::wire::TableSpec;

/// One editable table of a consent form, decoded from its wire spec and
/// mutated in place by user edits until the form is donated or cancelled.
///
/// Invariant: every row has exactly `head.len()` cells. Violations are
/// fatal; rows are never truncated or padded to fit.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsentTable {
    id: String,
    title: String,
    head: Vec<String>,
    rows: Vec<Vec<String>>,
    deleted_row_count: i64,
}

impl ConsentTable {
    /// Decode a column-major table encoding into an ordered table.
    ///
    /// Column order is the encoding's key insertion order. Each column
    /// carries one sentinel key past the last real row index, so the row
    /// count is the first column's key count minus one. Cell values are
    /// converted to text: strings verbatim, everything else as its JSON
    /// form.
    pub fn parse(spec: &TableSpec, locale: &str) -> Result<Self, ConsentError> {
        let frame: serde_json::Map<String, Value> =
            serde_json::from_str(&spec.data_frame).map_err(|e| ConsentError::MalformedFrame {
                id: spec.id.clone(),
                reason: e.to_string(),
            })?;

        let head: Vec<String> = frame.keys().cloned().collect();

        let row_count = match frame.values().next() {
            Some(Value::Object(first_column)) => first_column.len().saturating_sub(1),
            Some(_) => {
                return Err(ConsentError::MalformedFrame {
                    id: spec.id.clone(),
                    reason: "column value is not an object".to_string(),
                })
            }
            None => 0,
        };

        let mut rows = Vec::with_capacity(row_count);
        for row_index in 0..row_count {
            let key = row_index.to_string();
            let mut cells = Vec::with_capacity(head.len());
            for (column_name, column) in &frame {
                let column = column
                    .as_object()
                    .ok_or_else(|| ConsentError::MalformedFrame {
                        id: spec.id.clone(),
                        reason: format!("column '{column_name}' is not an object"),
                    })?;
                let value = column.get(&key).ok_or_else(|| ConsentError::MissingCell {
                    id: spec.id.clone(),
                    column: column_name.clone(),
                    row: row_index,
                })?;
                cells.push(cell_text(value));
            }
            rows.push(cells);
        }

        Ok(Self {
            id: spec.id.clone(),
            title: spec.title.resolve(locale).to_string(),
            head,
            rows,
            deleted_row_count: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn head(&self) -> &[String] {
        &self.head
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Signed cumulative deletion count across all edits.
    ///
    /// Goes negative when more rows are added back than were ever
    /// deleted; the count is deliberately not clamped, so a later
    /// deletion is still accounted against the surplus.
    pub fn deleted_row_count(&self) -> i64 {
        self.deleted_row_count
    }

    /// Replace the table's rows with the user's edited rows.
    ///
    /// Adds `old_len - new_len` to [`deleted_row_count`]. Every new row
    /// must match the head's cell count; a mismatch is fatal and leaves
    /// the table untouched.
    ///
    /// [`deleted_row_count`]: ConsentTable::deleted_row_count
    pub fn edit(&mut self, new_rows: Vec<Vec<String>>) -> Result<(), ConsentError> {
        for (row_index, row) in new_rows.iter().enumerate() {
            if row.len() != self.head.len() {
                return Err(ConsentError::ShapeMismatch {
                    id: self.id.clone(),
                    row: row_index,
                    got: row.len(),
                    expected: self.head.len(),
                });
            }
        }

        self.deleted_row_count += self.rows.len() as i64 - new_rows.len() as i64;
        self.rows = new_rows;
        Ok(())
    }

    /// Serialize to the bundle entry `{id: [row_object, ...]}` where each
    /// row object maps column name to cell text, in column order.
    pub(crate) fn to_bundle_entry(&self) -> Result<Value, ConsentError> {
        let mut body = Vec::with_capacity(self.rows.len());
        for (row_index, row) in self.rows.iter().enumerate() {
            if row.len() != self.head.len() {
                return Err(ConsentError::ShapeMismatch {
                    id: self.id.clone(),
                    row: row_index,
                    got: row.len(),
                    expected: self.head.len(),
                });
            }
            let mut object = serde_json::Map::with_capacity(self.head.len());
            for (column_name, cell) in self.head.iter().zip(row) {
                object.insert(column_name.clone(), Value::String(cell.clone()));
            }
            body.push(Value::Object(object));
        }

        let mut entry = serde_json::Map::with_capacity(1);
        entry.insert(self.id.clone(), Value::Array(body));
        Ok(Value::Object(entry))
    }
}

/// Textual form of a cell value: strings verbatim, anything else as its
/// JSON text (numbers, booleans, null).
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
