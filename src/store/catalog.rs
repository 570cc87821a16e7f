//! Bootstrap catalog written to a fresh data file.
//!
//! The built-in catalog ships as `assets/default_catalog.yaml`. A different
//! file with the same layout can be supplied through configuration:
//!
//! ```yaml
//! - category: soups
//!   products:
//!     - { name: "Lentil Soup", price: 0.005, unit: g }
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::models::{Document, Product};

const BUILTIN_CATALOG: &str = include_str!("../../assets/default_catalog.yaml");

#[derive(Debug, Clone, Deserialize)]
struct CatalogSection {
    category: String,
    #[serde(default)]
    products: Vec<SeedProduct>,
}

#[derive(Debug, Clone, Deserialize)]
struct SeedProduct {
    name: String,
    price: f64,
    unit: String,
}

/// An ordered list of categories and their products used to seed a store.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    sections: Vec<CatalogSection>,
}

impl SeedCatalog {
    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// A catalog with no products; seeding yields an empty document.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| StoreError::storage(path, e))?;
        Self::from_yaml(&contents).map_err(|e| match e {
            StoreError::Catalog(msg) => StoreError::Catalog(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let sections: Vec<CatalogSection> =
            serde_yaml::from_str(contents).map_err(|e| StoreError::Catalog(e.to_string()))?;

        for section in &sections {
            if section.category.trim().is_empty() {
                return Err(StoreError::Catalog("empty category name".to_string()));
            }
            for product in &section.products {
                if product.name.trim().is_empty() || product.unit.trim().is_empty() {
                    return Err(StoreError::Catalog(format!(
                        "product in '{}' is missing a name or unit",
                        section.category
                    )));
                }
            }
        }

        Ok(Self { sections })
    }

    /// Number of products the catalog will seed.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a fresh document holding every catalog product, numbered in order.
    ///
    /// A repeated `(category, name)` keeps only its first occurrence.
    pub fn seed(&self) -> Document {
        let mut doc = Document::default();
        for section in &self.sections {
            for item in &section.products {
                if doc.find_product(&section.category, &item.name).is_some() {
                    continue;
                }
                let id = doc.mint_product_id();
                doc.products.push(Product {
                    id,
                    category: section.category.clone(),
                    name: item.name.clone(),
                    price: item.price,
                    unit: item.unit.clone(),
                });
            }
        }
        doc
    }
}
