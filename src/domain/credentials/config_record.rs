use serde::Serialize;
use serde_json::Value;

use crate::domain::sheets::value_range::cell_at;

/// The API key / model / server triple stored one value per row.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigRecord {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub server_address: Option<String>,
}

impl ConfigRecord {
    /// Maps rows 1, 2 and 3 (first cell of each) to the three fields.
    /// A missing row or cell leaves its field unset.
    pub fn from_rows(rows: &[Vec<Value>]) -> Self {
        let first_cell = |index: usize| rows.get(index).and_then(|row| cell_at(row, 0));

        ConfigRecord {
            api_key: first_cell(0),
            model: first_cell(1),
            server_address: first_cell(2),
        }
    }
}
