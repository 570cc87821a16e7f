use clap::{Args, Subcommand};

use super::{date_arg, OutputFormat};
use wastetrack::{Store, WasteEntry, WasteInput};

#[derive(Args)]
pub struct WasteCommand {
    #[command(subcommand)]
    pub command: WasteSubcommand,
}

#[derive(Subcommand)]
pub enum WasteSubcommand {
    /// List waste entries recorded on a date
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Record wasted product
    Add {
        /// Category of the wasted product
        category: String,

        /// Product name
        product: String,

        /// Quantity wasted
        #[arg(long, short)]
        quantity: f64,

        /// Unit of the quantity (defaults to the catalog unit)
        #[arg(long, short)]
        unit: Option<String>,

        /// Money value lost (defaults to quantity x catalog price)
        #[arg(long, short)]
        value: Option<f64>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Edit an existing waste entry
    Edit {
        /// Entry ID
        id: u64,

        /// New date (YYYY-MM-DD)
        #[arg(long, short)]
        date: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New product name
        #[arg(long)]
        product: Option<String>,

        /// New quantity
        #[arg(long, short)]
        quantity: Option<f64>,

        /// New unit
        #[arg(long, short)]
        unit: Option<String>,

        /// New value
        #[arg(long, short)]
        value: Option<f64>,
    },

    /// Delete a waste entry
    Delete {
        /// Entry ID
        id: u64,
    },
}

impl WasteCommand {
    pub fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WasteSubcommand::List { date, format } => {
                let date = date_arg(date.as_deref())?;
                let entries = store.list_waste_by_date(&date)?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    }
                    OutputFormat::Text => print_entries(&date, &entries),
                }
                Ok(())
            }

            WasteSubcommand::Add {
                category,
                product,
                quantity,
                unit,
                value,
                date,
            } => {
                let date = date_arg(date.as_deref())?;

                let (unit, value) = match (unit, value) {
                    (Some(u), Some(v)) => (u.clone(), *v),
                    _ => {
                        let doc = store.load()?;
                        let known = doc.find_product(category, product).ok_or_else(|| {
                            format!(
                                "Product not in catalog: {} / {}. Pass --unit and --value.",
                                category, product
                            )
                        })?;
                        (
                            unit.clone().unwrap_or_else(|| known.unit.clone()),
                            value.unwrap_or(quantity * known.price),
                        )
                    }
                };

                let input = WasteInput::new(
                    date,
                    category.as_str(),
                    product.as_str(),
                    *quantity,
                    unit,
                    value,
                );
                let saved = store.upsert_waste(&input)?;
                println!("Entry saved: {}", saved.get());
                Ok(())
            }

            WasteSubcommand::Edit {
                id,
                date,
                category,
                product,
                quantity,
                unit,
                value,
            } => {
                let date = date.as_deref().map(|d| date_arg(Some(d))).transpose()?;

                let current = store
                    .load()?
                    .find_waste(*id)
                    .cloned()
                    .ok_or_else(|| format!("Entry not found: {}", id))?;

                let input = WasteInput::new(
                    date.unwrap_or(current.date),
                    category.clone().unwrap_or(current.category),
                    product.clone().unwrap_or(current.product),
                    quantity.unwrap_or(current.quantity),
                    unit.clone().unwrap_or(current.unit),
                    value.unwrap_or(current.value),
                )
                .with_id(*id);

                let saved = store.upsert_waste(&input)?;
                println!("Entry updated: {}", saved.get());
                Ok(())
            }

            WasteSubcommand::Delete { id } => {
                let removed = store.delete_waste(*id)?;
                println!("Deleted entry: {}", removed);
                Ok(())
            }
        }
    }
}

fn print_entries(date: &str, entries: &[WasteEntry]) {
    if entries.is_empty() {
        println!("No waste recorded on {}", date);
        return;
    }

    println!(
        "{:<5}  {:<24}  {:<28}  {:>10}  {:<6}  {:>10}",
        "ID", "CATEGORY", "PRODUCT", "QTY", "UNIT", "VALUE"
    );
    let mut total = 0.0;
    for e in entries {
        println!(
            "{:<5}  {:<24}  {:<28}  {:>10}  {:<6}  {:>10.2}",
            e.id, e.category, e.product, e.quantity, e.unit, e.value
        );
        total += e.value;
    }
    println!(
        "\nTotal: {} entry(ies) on {}, value {:.2}",
        entries.len(),
        date,
        total
    );
}
