use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::{lenient_f64, parse_entry_id, require_number, require_text, Numeric};
use crate::error::{Result, StoreError};

/// A dated waste record.
///
/// `category` and `product` are copies of catalog names, not references:
/// removing a product leaves its waste rows untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteEntry {
    pub id: u64,
    /// `YYYY-MM-DD`; compared as a plain string.
    pub date: String,
    pub category: String,
    pub product: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub quantity: f64,
    pub unit: String,
    /// Cost of the wasted quantity.
    #[serde(deserialize_with = "lenient_f64")]
    pub value: f64,
}

impl WasteEntry {
    pub fn matches(&self, date: &str, category: &str, product: &str) -> bool {
        self.date == date && self.category == category && self.product == product
    }
}

impl fmt::Display for WasteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {}/{}: {} {} (${:.2})",
            self.id, self.date, self.category, self.product, self.quantity, self.unit, self.value
        )
    }
}

/// A create or edit request for a waste entry. A non-zero `id` selects edit mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteInput {
    pub id: Option<Numeric>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub product: Option<String>,
    pub quantity: Option<Numeric>,
    pub unit: Option<String>,
    pub value: Option<Numeric>,
}

impl WasteInput {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        product: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            id: None,
            date: Some(date.into()),
            category: Some(category.into()),
            product: Some(product.into()),
            quantity: Some(quantity.into()),
            unit: Some(unit.into()),
            value: Some(value.into()),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(Numeric::Number(id as f64));
        self
    }

    pub(crate) fn validate(&self) -> Result<WasteChange> {
        let date = require_text("date", &self.date)?;
        let category = require_text("category", &self.category)?;
        let product = require_text("product", &self.product)?;
        let quantity = require_number("quantity", &self.quantity)?;
        let value = require_number("value", &self.value)?;
        let unit = require_text("unit", &self.unit)?;

        Ok(WasteChange {
            id: self.target_id()?,
            date,
            category,
            product,
            quantity,
            unit,
            value,
        })
    }

    /// `Ok(None)` means create: no id, the number 0, or an empty string.
    /// Any other id selects edit mode, so the string `"0"` edits entry 0,
    /// which never exists. An id that cannot name any entry is not found.
    fn target_id(&self) -> Result<Option<u64>> {
        let not_found = || StoreError::NotFound("Entry not found".to_string());
        match &self.id {
            None => Ok(None),
            Some(Numeric::Number(n)) if *n == 0.0 => Ok(None),
            Some(Numeric::Text(s)) if s.is_empty() => Ok(None),
            Some(Numeric::Number(n)) => {
                if n.is_finite() && *n > 0.0 {
                    Ok(Some(n.trunc() as u64))
                } else {
                    Err(not_found())
                }
            }
            Some(Numeric::Text(s)) => parse_entry_id(s).map(Some).ok_or_else(not_found),
        }
    }
}

/// A validated [`WasteInput`].
#[derive(Debug, Clone)]
pub(crate) struct WasteChange {
    pub id: Option<u64>,
    pub date: String,
    pub category: String,
    pub product: String,
    pub quantity: f64,
    pub unit: String,
    pub value: f64,
}

impl WasteChange {
    pub fn apply_to(self, entry: &mut WasteEntry) {
        entry.date = self.date;
        entry.category = self.category;
        entry.product = self.product;
        entry.quantity = self.quantity;
        entry.unit = self.unit;
        entry.value = self.value;
    }

    pub fn into_entry(self, id: u64) -> WasteEntry {
        WasteEntry {
            id,
            date: self.date,
            category: self.category,
            product: self.product,
            quantity: self.quantity,
            unit: self.unit,
            value: self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lettuce() -> WasteInput {
        WasteInput::new("2024-03-01", "fresh_garnishes_produce", "Lettuce", 200.0, "g", 1.0)
    }

    #[test]
    fn test_validate_create() {
        let change = lettuce().validate().unwrap();
        assert_eq!(change.id, None);
        assert_eq!(change.date, "2024-03-01");
        assert_eq!(change.quantity, 200.0);
    }

    #[test]
    fn test_validate_edit_ids() {
        assert_eq!(lettuce().with_id(4).validate().unwrap().id, Some(4));

        let mut input = lettuce();
        input.id = Some("9".into());
        assert_eq!(input.validate().unwrap().id, Some(9));

        input.id = Some(0.0.into());
        assert_eq!(input.validate().unwrap().id, None);

        input.id = Some("".into());
        assert_eq!(input.validate().unwrap().id, None);

        input.id = Some("0".into());
        assert_eq!(input.validate().unwrap().id, Some(0));

        input.id = Some("nine".into());
        assert!(matches!(input.validate(), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_validate_missing_fields_before_id() {
        let mut input = lettuce();
        input.id = Some("nine".into());
        input.unit = None;
        assert!(matches!(input.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_validate_accepts_zero_quantity() {
        let mut input = lettuce();
        input.quantity = Some(0.0.into());
        input.value = Some("0".into());
        let change = input.validate().unwrap();
        assert_eq!(change.quantity, 0.0);
        assert_eq!(change.value, 0.0);
    }

    #[test]
    fn test_input_from_json() {
        let input: WasteInput = serde_json::from_str(
            r#"{"id":"3","date":"2024-01-01","category":"A","product":"X","quantity":"2","unit":"pcs","value":10}"#,
        )
        .unwrap();
        let change = input.validate().unwrap();
        assert_eq!(change.id, Some(3));
        assert_eq!(change.quantity, 2.0);
        assert_eq!(change.value, 10.0);
    }

    #[test]
    fn test_change_into_entry() {
        let entry = lettuce().validate().unwrap().into_entry(7);
        assert_eq!(entry.id, 7);
        assert!(entry.matches("2024-03-01", "fresh_garnishes_produce", "Lettuce"));
    }
}
