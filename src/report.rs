//! Waste cost reports.
//!
//! Entries are folded into running totals per product, per category and
//! overall. Totals keep the order in which each key was first seen.

use serde::Serialize;
use std::fmt::Write;

use crate::error::Result;
use crate::models::{OrderedMap, WasteEntry};
use crate::store::Store;

/// Inclusive date range, compared as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        // Blank bounds count as missing.
        let clean = |s: Option<String>| s.filter(|s| !s.is_empty());
        Self {
            start: clean(start),
            end: clean(end),
        }
    }

    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::new(Some(start.into()), Some(end.into()))
    }

    /// Filtering applies only when both bounds are present.
    pub fn contains(&self, date: &str) -> bool {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => start.as_str() <= date && date <= end.as_str(),
            _ => true,
        }
    }
}

/// Totals of waste value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub by_product: OrderedMap<f64>,
    pub by_category: OrderedMap<f64>,
    pub total: f64,
}

impl Summary {
    /// Folds `entries` that fall inside `range` into a summary.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a WasteEntry>,
        range: &DateRange,
    ) -> Self {
        let mut summary = Summary::default();
        for entry in entries.into_iter().filter(|e| range.contains(&e.date)) {
            *summary.by_product.get_or_insert_with(&entry.product, || 0.0) += entry.value;
            *summary.by_category.get_or_insert_with(&entry.category, || 0.0) += entry.value;
            summary.total += entry.value;
        }
        summary
    }

    /// Renders the summary as CSV with two-decimal money values.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Type,Name,Value ($)\n");
        for (name, value) in self.by_product.iter() {
            let _ = writeln!(csv, "byProduct,{},{:.2}", csv_field(name), value);
        }
        for (name, value) in self.by_category.iter() {
            let _ = writeln!(csv, "byCategory,{},{:.2}", csv_field(name), value);
        }
        let _ = writeln!(csv, "total,Total,{:.2}", self.total);
        csv
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl Store {
    /// Summarizes waste value, limited to `range` when both bounds are given.
    pub fn summarize(&self, range: &DateRange) -> Result<Summary> {
        self.read(|doc| Summary::from_entries(&doc.waste, range))
    }
}
