use serde::{Deserialize, Serialize};

use super::product::Product;
use super::waste_entry::WasteEntry;

fn first_id() -> u64 {
    1
}

/// The entire persisted dataset.
///
/// The id counters live here so they survive restarts and are never reused,
/// even after the records they numbered are deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub waste: Vec<WasteEntry>,
    #[serde(default = "first_id")]
    pub next_product_id: u64,
    #[serde(default = "first_id")]
    pub next_waste_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            waste: Vec::new(),
            next_product_id: first_id(),
            next_waste_id: first_id(),
        }
    }
}

impl Document {
    /// Returns a fresh product id and advances the counter.
    pub fn mint_product_id(&mut self) -> u64 {
        let id = self.next_product_id.max(1);
        self.next_product_id = id + 1;
        id
    }

    /// Returns a fresh waste entry id and advances the counter.
    pub fn mint_waste_id(&mut self) -> u64 {
        let id = self.next_waste_id.max(1);
        self.next_waste_id = id + 1;
        id
    }

    pub fn find_product(&self, category: &str, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.matches(category, name))
    }

    pub fn find_waste(&self, id: u64) -> Option<&WasteEntry> {
        self.waste.iter().find(|w| w.id == id)
    }
}
