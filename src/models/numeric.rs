//! Lenient numeric values.
//!
//! Clients send prices, quantities and costs either as JSON numbers or as
//! numeric strings. Both are accepted at the request boundary and in the
//! stored document; everything past that point works with plain `f64`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, StoreError};

/// A number as received from a client: either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Coerce to a finite `f64`. Blank or non-numeric strings yield `None`.
    pub fn to_f64(&self) -> Option<f64> {
        let n = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    fn is_blank(&self) -> bool {
        matches!(self, Numeric::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for Numeric {
    fn from(n: f64) -> Self {
        Numeric::Number(n)
    }
}

impl From<&str> for Numeric {
    fn from(s: &str) -> Self {
        Numeric::Text(s.to_string())
    }
}

/// Require a non-blank text field.
pub(crate) fn require_text(field: &str, value: &Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(StoreError::Validation(format!("Missing field: {}", field))),
    }
}

/// Require a numeric field, coercing strings.
pub(crate) fn require_number(field: &str, value: &Option<Numeric>) -> Result<f64> {
    match value {
        None => Err(StoreError::Validation(format!("Missing field: {}", field))),
        Some(v) if v.is_blank() => Err(StoreError::Validation(format!("Missing field: {}", field))),
        Some(v) => v
            .to_f64()
            .ok_or_else(|| StoreError::Validation(format!("Field {} must be a number", field))),
    }
}

/// Parse a waste entry id the way a client-side integer parse would:
/// leading whitespace is skipped and the leading run of digits is used.
///
/// `"12"`, `" 12"` and `"12abc"` all give `Some(12)`; `"abc"` and `""` give `None`.
pub fn parse_entry_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Deserialize a stored `f64`, coercing the way a client-side float parse
/// would: numeric strings are parsed, while `null` and anything non-numeric
/// become NaN instead of failing the whole document.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Numeric>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Numeric::Number(n)) => n,
        Some(Numeric::Text(s)) => s.trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    })
}
