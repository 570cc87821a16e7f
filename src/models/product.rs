use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::{lenient_f64, require_number, require_text, Numeric};
use super::ordered_map::OrderedMap;
use crate::error::{Result, StoreError};

/// A priced catalog item, unique by `(category, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub category: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    pub unit: String,
}

impl Product {
    pub fn matches(&self, category: &str, name: &str) -> bool {
        self.category == category && self.name == name
    }

    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            price: self.price,
            unit: self.unit.clone(),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({} per {})",
            self.category, self.name, self.price, self.unit
        )
    }
}

/// The per-product view exposed in categorized listings (no id).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetails {
    pub price: f64,
    pub unit: String,
}

/// Products grouped as category -> name -> details.
pub type Catalog = OrderedMap<OrderedMap<ProductDetails>>;

/// A create or edit request for a product.
///
/// When both `old_category` and `old_name` are set the request edits the
/// product currently stored under that pair; otherwise it creates one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub category: Option<String>,
    pub name: Option<String>,
    pub price: Option<Numeric>,
    pub unit: Option<String>,
    pub old_category: Option<String>,
    pub old_name: Option<String>,
}

impl ProductInput {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            category: Some(category.into()),
            name: Some(name.into()),
            price: Some(price.into()),
            unit: Some(unit.into()),
            old_category: None,
            old_name: None,
        }
    }

    /// Turn this request into an edit of the product stored under `(category, name)`.
    pub fn replacing(mut self, category: impl Into<String>, name: impl Into<String>) -> Self {
        self.old_category = Some(category.into());
        self.old_name = Some(name.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<ProductChange> {
        let change = ProductChange {
            category: require_text("category", &self.category)?,
            name: require_text("name", &self.name)?,
            price: require_number("price", &self.price)?,
            unit: require_text("unit", &self.unit)?,
            original: match (&self.old_category, &self.old_name) {
                (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => {
                    Some((c.clone(), n.clone()))
                }
                _ => None,
            },
        };
        if change.price < 0.0 {
            return Err(StoreError::Validation(
                "Field price must not be negative".to_string(),
            ));
        }
        Ok(change)
    }
}

/// A validated [`ProductInput`].
#[derive(Debug, Clone)]
pub(crate) struct ProductChange {
    pub category: String,
    pub name: String,
    pub price: f64,
    pub unit: String,
    pub original: Option<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_create() {
        let change = ProductInput::new("soups", "Lentil Soup", 0.005, "g")
            .validate()
            .unwrap();
        assert_eq!(change.category, "soups");
        assert_eq!(change.name, "Lentil Soup");
        assert_eq!(change.price, 0.005);
        assert!(change.original.is_none());
    }

    #[test]
    fn test_validate_edit_needs_both_old_keys() {
        let input = ProductInput {
            old_category: Some("soups".to_string()),
            ..ProductInput::new("soups", "Lentil Soup", 1.0, "g")
        };
        assert!(input.validate().unwrap().original.is_none());

        let input = ProductInput::new("soups", "Lentil Soup", 1.0, "g").replacing("soups", "Old");
        assert_eq!(
            input.validate().unwrap().original,
            Some(("soups".to_string(), "Old".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut input = ProductInput::new("soups", "", 1.0, "g");
        assert!(matches!(input.validate(), Err(StoreError::Validation(_))));

        input.name = Some("Soup".to_string());
        input.price = None;
        assert!(matches!(input.validate(), Err(StoreError::Validation(_))));

        input.price = Some((-1.0).into());
        assert!(matches!(input.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_input_from_json_with_string_price() {
        let input: ProductInput = serde_json::from_str(
            r#"{"category":"breads_dough","name":"Lavash","price":"5","unit":"pcs","oldCategory":null}"#,
        )
        .unwrap();
        let change = input.validate().unwrap();
        assert_eq!(change.price, 5.0);
        assert!(change.original.is_none());
    }

    #[test]
    fn test_product_reads_string_price() {
        let product: Product = serde_json::from_str(
            r#"{"id":3,"category":"fruits","name":"Grapes","price":"0.005","unit":"g"}"#,
        )
        .unwrap();
        assert_eq!(product.price, 0.005);
        assert!(product.matches("fruits", "Grapes"));
    }
}
