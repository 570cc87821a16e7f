use clap::{Args, ValueEnum};

use super::date_arg;
use wastetrack::{DateRange, Store, Summary};

#[derive(Clone, ValueEnum, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Args)]
pub struct ReportCommand {
    /// First day of the period (YYYY-MM-DD)
    #[arg(long, short, requires = "end")]
    pub start: Option<String>,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long, short, requires = "start")]
    pub end: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

impl ReportCommand {
    pub fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        let range = match (&self.start, &self.end) {
            (Some(start), Some(end)) => {
                DateRange::between(date_arg(Some(start))?, date_arg(Some(end))?)
            }
            _ => DateRange::default(),
        };
        let summary = store.summarize(&range)?;

        match self.format {
            ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            ReportFormat::Csv => print!("{}", summary.to_csv()),
            ReportFormat::Text => print_summary(&range, &summary),
        }
        Ok(())
    }
}

fn print_summary(range: &DateRange, summary: &Summary) {
    match (&range.start, &range.end) {
        (Some(start), Some(end)) => println!("Waste report {} to {}", start, end),
        _ => println!("Waste report (all dates)"),
    }
    println!();

    if summary.by_product.is_empty() {
        println!("No waste recorded");
        return;
    }

    println!("By product:");
    for (name, value) in summary.by_product.iter() {
        println!("  {:<30}  {:>10.2}", name, value);
    }
    println!();

    println!("By category:");
    for (name, value) in summary.by_category.iter() {
        println!("  {:<30}  {:>10.2}", name, value);
    }
    println!();

    println!("  {:<30}  {:>10.2}", "Total", summary.total);
}
