mod document;
mod numeric;
mod ordered_map;
mod product;
mod waste_entry;

pub use document::Document;
pub use numeric::{parse_entry_id, Numeric};
pub use ordered_map::OrderedMap;
pub use product::{Catalog, Product, ProductDetails, ProductInput};
pub use waste_entry::{WasteEntry, WasteInput};
