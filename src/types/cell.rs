use serde::{Deserialize, Serialize};

/// A cell value as produced by content callbacks or submitted by an edit.
///
/// `Custom` carries the payload of compound cells (dropdown-style custom
/// cells). For those, the comparable display value lives in the nested
/// `"value"` field of the payload rather than the payload itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum CellValue {
    /// Not yet loaded, or genuinely empty.
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Compound cell payload (e.g. dropdown cells carrying `{ value, options }`).
    Custom(serde_json::Value),
}

impl CellValue {
    /// Human-readable value for confirmation messages.
    ///
    /// Compound cells are unwrapped through their nested `"value"` field;
    /// every other kind renders its payload directly.
    #[must_use]
    pub fn display_value(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Custom(data) => match data.get("value") {
                Some(inner) => json_display(inner),
                None => json_display(data),
            },
        }
    }

    /// Whether this value holds any data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Render a JSON value without quoting plain strings.
fn json_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_display_values() {
        assert_eq!(CellValue::Text("abc".into()).display_value(), "abc");
        assert_eq!(CellValue::Number(2.5).display_value(), "2.5");
        assert_eq!(CellValue::Boolean(true).display_value(), "true");
        assert_eq!(CellValue::Empty.display_value(), "");
    }

    #[test]
    fn test_custom_display_unwraps_nested_value() {
        let v = CellValue::Custom(json!({ "value": "50u", "options": ["50u", "75u"] }));
        assert_eq!(v.display_value(), "50u");
    }

    #[test]
    fn test_custom_display_without_nested_value_falls_back() {
        let v = CellValue::Custom(json!("raw"));
        assert_eq!(v.display_value(), "raw");
    }
}
