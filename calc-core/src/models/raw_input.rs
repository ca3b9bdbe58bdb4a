use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single user-supplied value as it arrives from a form field or a JSON
/// request: either free text (`"$1,200"`, `"5'10\""`) or an already numeric
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(Decimal),
}

impl RawValue {
    /// Text view of the value, used for error messages and text-only fields.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }

    /// Whitespace-only text counts as blank; a field holding a blank value is
    /// treated as absent.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for RawValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Decimal> for RawValue {
    fn from(n: Decimal) -> Self {
        Self::Number(n)
    }
}

/// Field name to raw value, one map per calculation request.
pub type RawInputs = HashMap<String, RawValue>;
