use serde_json::Value;
use tracing::debug;

use crate::consent::error::ConsentError;
use crate::consent::table::ConsentTable;
use crate::wire::ConsentFormPrompt;

/// The consent form's working state while its prompt is on screen:
/// editable tables the user may trim, and read-only meta tables that are
/// always donated in full.
///
/// Created when the prompt is first rendered, consumed once at donate or
/// cancel.
#[derive(Debug, Clone)]
pub struct ConsentForm {
    tables: Vec<ConsentTable>,
    meta_tables: Vec<ConsentTable>,
}

impl ConsentForm {
    /// Parse every table spec of the prompt. Fails on the first malformed
    /// spec; a form is never built from a partial decode.
    pub fn from_prompt(prompt: &ConsentFormPrompt, locale: &str) -> Result<Self, ConsentError> {
        let tables = prompt
            .tables
            .iter()
            .map(|spec| ConsentTable::parse(spec, locale))
            .collect::<Result<Vec<_>, _>>()?;
        let meta_tables = prompt
            .meta_tables
            .iter()
            .map(|spec| ConsentTable::parse(spec, locale))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            tables = tables.len(),
            meta_tables = meta_tables.len(),
            "consent form parsed"
        );
        Ok(Self {
            tables,
            meta_tables,
        })
    }

    pub fn tables(&self) -> &[ConsentTable] {
        &self.tables
    }

    pub fn meta_tables(&self) -> &[ConsentTable] {
        &self.meta_tables
    }

    /// Apply a user edit to the editable table with the given id. Last
    /// write wins; meta tables cannot be targeted.
    pub fn edit(&mut self, table_id: &str, new_rows: Vec<Vec<String>>) -> Result<(), ConsentError> {
        let table = self
            .tables
            .iter_mut()
            .find(|table| table.id() == table_id)
            .ok_or_else(|| ConsentError::UnknownTable(table_id.to_string()))?;
        table.edit(new_rows)
    }

    /// Serialize the donation bundle: one `{id: [rows]}` entry per
    /// editable table in its latest edited state, then one per meta table
    /// (always unedited), then the `user_omissions` trailer.
    ///
    /// The trailer is always present. It holds, as a JSON string, one
    /// notice per editable table whose deletion count is positive.
    pub fn serialize(&self) -> Result<String, ConsentError> {
        let mut bundle = Vec::with_capacity(self.tables.len() + self.meta_tables.len() + 1);
        for table in self.tables.iter().chain(&self.meta_tables) {
            bundle.push(table.to_bundle_entry()?);
        }

        let notices: Vec<String> = self
            .tables
            .iter()
            .filter(|table| table.deleted_row_count() > 0)
            .map(|table| {
                format!(
                    "User deleted {} rows from table: {}",
                    table.deleted_row_count(),
                    table.id()
                )
            })
            .collect();

        let mut trailer = serde_json::Map::with_capacity(1);
        trailer.insert(
            "user_omissions".to_string(),
            Value::String(serde_json::to_string(&notices)?),
        );
        bundle.push(Value::Object(trailer));

        Ok(serde_json::to_string(&Value::Array(bundle))?)
    }
}
