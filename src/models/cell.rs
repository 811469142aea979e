//! Raw cell values as they arrive from a spreadsheet, CSV file or editor

use serde::{Deserialize, Serialize};
use std::fmt;

/// An untyped cell, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawCell {
    #[default]
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl RawCell {
    /// Build a cell from text, mapping blank strings to `Empty`
    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::from_text(s)
    }
}

impl From<String> for RawCell {
    fn from(s: String) -> Self {
        RawCell::from_text(&s)
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Number(v) => write!(f, "{}", v),
            RawCell::Bool(b) => write!(f, "{}", b),
            RawCell::Text(s) => write!(f, "{}", s),
        }
    }
}
