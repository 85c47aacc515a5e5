//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the value held by a single rendered cell.
//! CONTEXT: Header panels carry labels, data panels carry raw values.
//! The merge policies only ever compare values, so equality here is
//! the single source of truth for "these two cells show the same thing".

use serde::{Deserialize, Serialize};

/// Represents the possible errors a cell can hold (e.g., #DIV/0!)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellError {
    Div0,  // Division by zero
    Ref,   // Invalid reference
    Name,  // Unknown name
    Value, // Wrong type of argument
    NA,    // Value not available
}

/// Represents the calculated result or raw data within a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(CellError),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns true when two cells may be rendered as one merged block.
    /// Empty cells never merge, otherwise the values must be equal.
    pub fn merges_with(&self, other: &CellValue) -> bool {
        !self.is_empty() && self == other
    }

    /// Returns the display value of the cell as a String.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => {
                let label = if *b { "TRUE" } else { "FALSE" };
                label.to_string()
            }
            CellValue::Error(e) => format!("#{:?}", e).to_uppercase(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}
