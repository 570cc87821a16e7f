use super::{Saved, Store};
use crate::error::{Result, StoreError};
use crate::models::{Catalog, OrderedMap, Product, ProductInput};

impl Store {
    /// Lists all products as category -> name -> `{price, unit}`, in stored order.
    pub fn list_categorized(&self) -> Result<Catalog> {
        self.read(|doc| {
            let mut catalog = Catalog::new();
            for product in &doc.products {
                catalog
                    .get_or_insert_with(&product.category, OrderedMap::new)
                    .insert(product.name.clone(), product.details());
            }
            catalog
        })
    }

    /// Lists all products with their ids, in stored order.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        self.read(|doc| doc.products.clone())
    }

    /// Creates a product, or edits one when the input names an original
    /// `(oldCategory, oldName)` pair.
    pub fn upsert_product(&self, input: &ProductInput) -> Result<Saved<Product>> {
        let change = input.validate()?;

        self.mutate(|doc| match &change.original {
            Some((old_category, old_name)) => {
                let index = doc
                    .products
                    .iter()
                    .position(|p| p.matches(old_category, old_name))
                    .ok_or_else(|| {
                        StoreError::NotFound("Original product not found".to_string())
                    })?;

                let renamed = change.category != *old_category || change.name != *old_name;
                if renamed && doc.find_product(&change.category, &change.name).is_some() {
                    return Err(StoreError::Conflict(
                        "Product with same name already exists in this category".to_string(),
                    ));
                }

                let product = &mut doc.products[index];
                product.category = change.category.clone();
                product.name = change.name.clone();
                product.price = change.price;
                product.unit = change.unit.clone();
                tracing::debug!("Updated product {}", product);
                Ok(Saved::Updated(product.clone()))
            }
            None => {
                if doc.find_product(&change.category, &change.name).is_some() {
                    return Err(StoreError::Conflict("Product already exists".to_string()));
                }

                let product = Product {
                    id: doc.mint_product_id(),
                    category: change.category.clone(),
                    name: change.name.clone(),
                    price: change.price,
                    unit: change.unit.clone(),
                };
                tracing::debug!("Added product #{} {}", product.id, product);
                doc.products.push(product.clone());
                Ok(Saved::Created(product))
            }
        })
    }

    /// Removes the product stored under `(category, name)`.
    ///
    /// Waste entries naming the product are left as they are.
    pub fn delete_product(&self, category: &str, name: &str) -> Result<Product> {
        self.mutate(|doc| {
            let index = doc
                .products
                .iter()
                .position(|p| p.matches(category, name))
                .ok_or_else(|| StoreError::NotFound("Product not found".to_string()))?;
            let removed = doc.products.remove(index);
            tracing::debug!("Deleted product #{} {}", removed.id, removed);
            Ok(removed)
        })
    }
}
