use clap::{Args, Subcommand};
use std::io::{self, Write};

use super::OutputFormat;
use wastetrack::{ProductInput, Store};

#[derive(Args)]
pub struct ProductsCommand {
    #[command(subcommand)]
    pub command: ProductsSubcommand,
}

#[derive(Subcommand)]
pub enum ProductsSubcommand {
    /// List products grouped by category
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a product to the catalog
    Add {
        /// Category the product belongs to
        category: String,

        /// Product name
        name: String,

        /// Price per unit
        #[arg(long)]
        price: f64,

        /// Unit of measurement (g, kg, pcs, skewer, ...)
        #[arg(long)]
        unit: String,
    },

    /// Edit an existing product
    Edit {
        /// Current category
        category: String,

        /// Current name
        name: String,

        /// Move to another category
        #[arg(long)]
        new_category: Option<String>,

        /// Rename the product
        #[arg(long)]
        new_name: Option<String>,

        /// New price per unit
        #[arg(long)]
        price: Option<f64>,

        /// New unit
        #[arg(long)]
        unit: Option<String>,
    },

    /// Remove a product from the catalog
    Delete {
        /// Category
        category: String,

        /// Product name
        name: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ProductsCommand {
    pub fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProductsSubcommand::List { format, category } => {
                let catalog = store.list_categorized()?;

                match format {
                    OutputFormat::Json => match category {
                        Some(c) => match catalog.get(c) {
                            Some(products) => {
                                println!("{}", serde_json::to_string_pretty(products)?)
                            }
                            None => println!("{{}}"),
                        },
                        None => println!("{}", serde_json::to_string_pretty(&catalog)?),
                    },
                    OutputFormat::Text => {
                        let mut shown = 0;
                        for (name, products) in catalog.iter() {
                            if category.as_deref().is_some_and(|c| c != name) {
                                continue;
                            }
                            println!("{}", name);
                            for (product, details) in products.iter() {
                                println!(
                                    "  {:<30}  {:>10}  per {}",
                                    product, details.price, details.unit
                                );
                                shown += 1;
                            }
                        }
                        if shown == 0 {
                            println!("No products found");
                        } else {
                            println!("\nTotal: {} product(s)", shown);
                        }
                    }
                }
                Ok(())
            }

            ProductsSubcommand::Add {
                category,
                name,
                price,
                unit,
            } => {
                let saved = store.upsert_product(&ProductInput::new(
                    category.as_str(),
                    name.as_str(),
                    *price,
                    unit.as_str(),
                ))?;
                println!("Product added: {}", saved.get());
                Ok(())
            }

            ProductsSubcommand::Edit {
                category,
                name,
                new_category,
                new_name,
                price,
                unit,
            } => {
                if new_category.is_none() && new_name.is_none() && price.is_none() && unit.is_none()
                {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let current = store
                    .list_products()?
                    .into_iter()
                    .find(|p| p.matches(category, name))
                    .ok_or_else(|| format!("Product not found: {} / {}", category, name))?;

                let input = ProductInput::new(
                    new_category.clone().unwrap_or(current.category),
                    new_name.clone().unwrap_or(current.name),
                    price.unwrap_or(current.price),
                    unit.clone().unwrap_or(current.unit),
                )
                .replacing(category.as_str(), name.as_str());

                let saved = store.upsert_product(&input)?;
                println!("Product updated: {}", saved.get());
                Ok(())
            }

            ProductsSubcommand::Delete {
                category,
                name,
                force,
            } => {
                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete product '{} / {}'? [y/N] ", category, name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let removed = store.delete_product(category, name)?;
                println!("Deleted product: {}", removed);
                Ok(())
            }
        }
    }
}
