use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the Sheets `values` endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<Value>>>,
}

pub trait CellText {
    fn cell_text(&self) -> String;
}

impl CellText for Value {
    fn cell_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Text of the `index`-th cell of a row, `None` when the API left it out.
pub fn cell_at(row: &[Value], index: usize) -> Option<String> {
    row.get(index).map(CellText::cell_text)
}
