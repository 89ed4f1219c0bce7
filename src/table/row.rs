use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single cell value pulled out of a row record by column key
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Option<String>> for CellValue {
    fn from(s: Option<String>) -> Self {
        s.map(CellValue::Text).unwrap_or(CellValue::Empty)
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Integer(i),
                None => CellValue::Float(n.as_f64().unwrap_or_default()),
            },
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// A row record the table can index by column key.
///
/// The table never interprets the record's shape beyond this lookup;
/// a key the record doesn't know yields `CellValue::Empty`.
pub trait TableRow {
    fn cell(&self, key: &str) -> CellValue;
}

impl TableRow for Value {
    fn cell(&self, key: &str) -> CellValue {
        self.get(key).map(CellValue::from).unwrap_or(CellValue::Empty)
    }
}

impl TableRow for HashMap<String, String> {
    fn cell(&self, key: &str) -> CellValue {
        self.get(key)
            .map(|s| CellValue::Text(s.clone()))
            .unwrap_or(CellValue::Empty)
    }
}

impl TableRow for BTreeMap<String, String> {
    fn cell(&self, key: &str) -> CellValue {
        self.get(key)
            .map(|s| CellValue::Text(s.clone()))
            .unwrap_or(CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_row_lookup() {
        let row = json!({"name": "Ada", "age": 36, "score": 1.5, "active": true, "email": null});
        assert_eq!(row.cell("name"), CellValue::Text("Ada".to_string()));
        assert_eq!(row.cell("age"), CellValue::Integer(36));
        assert_eq!(row.cell("score"), CellValue::Float(1.5));
        assert_eq!(row.cell("active").to_string(), "true");
        assert!(row.cell("email").is_empty());
        assert!(row.cell("missing").is_empty());
    }
}
