use super::{Saved, Store};
use crate::error::{Result, StoreError};
use crate::models::{parse_entry_id, WasteEntry, WasteInput};

impl Store {
    /// Returns the entries whose date equals `date` exactly.
    ///
    /// No normalization happens: `"2024-1-5"` does not match `"2024-01-05"`.
    pub fn list_waste_by_date(&self, date: &str) -> Result<Vec<WasteEntry>> {
        self.read(|doc| {
            doc.waste
                .iter()
                .filter(|entry| entry.date == date)
                .cloned()
                .collect()
        })
    }

    /// Creates an entry, or overwrites the entry named by `input.id`.
    ///
    /// The `(date, category, product)` uniqueness rule is only enforced on
    /// create; an edit may leave two entries sharing a triple.
    pub fn upsert_waste(&self, input: &WasteInput) -> Result<Saved<WasteEntry>> {
        let change = input.validate()?;

        self.mutate(|doc| match change.id {
            Some(id) => {
                let entry = doc
                    .waste
                    .iter_mut()
                    .find(|w| w.id == id)
                    .ok_or_else(|| StoreError::NotFound("Entry not found".to_string()))?;
                change.apply_to(entry);
                tracing::debug!("Updated waste entry {}", entry);
                Ok(Saved::Updated(entry.clone()))
            }
            None => {
                if doc
                    .waste
                    .iter()
                    .any(|w| w.matches(&change.date, &change.category, &change.product))
                {
                    return Err(StoreError::Conflict(
                        "Entry for this product on this date exists".to_string(),
                    ));
                }

                let entry = change.into_entry(doc.mint_waste_id());
                tracing::debug!("Added waste entry {}", entry);
                doc.waste.push(entry.clone());
                Ok(Saved::Created(entry))
            }
        })
    }

    /// Removes the entry with the given id.
    pub fn delete_waste(&self, id: u64) -> Result<WasteEntry> {
        self.mutate(|doc| {
            let index = doc
                .waste
                .iter()
                .position(|w| w.id == id)
                .ok_or_else(|| StoreError::NotFound("Entry not found".to_string()))?;
            let removed = doc.waste.remove(index);
            tracing::debug!("Deleted waste entry {}", removed);
            Ok(removed)
        })
    }

    /// Removes the entry named by a raw id string such as a query parameter.
    ///
    /// An id that does not parse names no entry and is reported as not found.
    pub fn delete_waste_by_key(&self, raw_id: &str) -> Result<WasteEntry> {
        match parse_entry_id(raw_id) {
            Some(id) => self.delete_waste(id),
            None => Err(StoreError::NotFound("Entry not found".to_string())),
        }
    }
}
