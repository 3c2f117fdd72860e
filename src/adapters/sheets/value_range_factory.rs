use serde_json::Value;
use std::borrow::Cow;

use crate::domain::sheets::value_range::ValueRange;

pub trait ValueRangeFactory {
    fn from_row<'a, T: Into<Cow<'a, str>> + Clone>(row_values: &[T]) -> Self;
}

fn wrap_value<'a, T: Into<Cow<'a, str>>>(value: T) -> Value {
    Value::String(value.into().into_owned())
}

impl ValueRangeFactory for ValueRange {
    fn from_row<'a, T: Into<Cow<'a, str>> + Clone>(row_values: &[T]) -> Self {
        ValueRange {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: Some(vec![row_values
                .iter()
                .map(|cell| wrap_value(cell.clone()))
                .collect()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_value() {
        let value = wrap_value("1");
        assert_eq!(value, Value::String("1".to_string()));
    }

    #[test]
    fn test_from_row() {
        let value_range = ValueRange::from_row(&["x", "k"]);
        assert_eq!(
            value_range.major_dimension,
            Some("ROWS".to_string()),
            "Major dimension should be ROWS"
        );
        assert_eq!(value_range.range, None, "Range should be None");
        assert_eq!(
            value_range.values,
            Some(vec![vec![
                Value::String("x".to_string()),
                Value::String("k".to_string())
            ]]),
            "Values should be one row with Value::String(\"x\") and Value::String(\"k\")"
        );
    }

    #[test]
    fn test_from_row_keeps_empty_cells() {
        let value_range = ValueRange::from_row(&[String::new(), "k".to_string()]);
        assert_eq!(
            value_range.values,
            Some(vec![vec![
                Value::String(String::new()),
                Value::String("k".to_string())
            ]])
        );
    }
}
