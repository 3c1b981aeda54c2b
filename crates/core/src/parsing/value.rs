use chrono::NaiveDate;
use serde_json::Value;

/// A loosely-typed scalar coming from an external source.
///
/// Spreadsheet cells (via calamine) and ERP JSON fields are folded into this
/// enum so the parsers in this module can stay source-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl RawValue {
    /// True when the value carries no usable content.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Folds a calamine cell into a raw value.
    ///
    /// Excel serial date/times are kept as numbers; the date parser applies
    /// the 1899-12-30 epoch conversion itself, so no calamine date feature
    /// is required here.
    pub fn from_cell(cell: &calamine::Data) -> Self {
        use calamine::Data;
        match cell {
            Data::Empty => RawValue::Empty,
            Data::String(s) => RawValue::Text(s.clone()),
            Data::Float(f) => RawValue::Number(*f),
            Data::Int(i) => RawValue::Number(*i as f64),
            Data::Bool(b) => RawValue::Text(b.to_string()),
            Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) => RawValue::Text(s.clone()),
            Data::DurationIso(s) => RawValue::Text(s.clone()),
            Data::Error(e) => RawValue::Text(format!("{:?}", e)),
        }
    }

    /// Folds a JSON scalar into a raw value. Objects and arrays are treated
    /// as absent, never an error.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Empty),
            Value::Bool(b) => RawValue::Text(b.to_string()),
            _ => RawValue::Empty,
        }
    }

    /// The value rendered as display text, used for memos and diagnostics.
    pub fn display(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            RawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            RawValue::Empty => String::new(),
        }
    }
}
