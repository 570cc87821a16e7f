use chrono::{Local, NaiveDate};
use clap::ValueEnum;

mod config_cmd;
mod products;
mod report;
mod waste;

pub use config_cmd::ConfigCommand;
pub use products::ProductsCommand;
pub use report::ReportCommand;
pub use waste::WasteCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parse a YYYY-MM-DD date argument, defaulting to today.
///
/// Dates are written back zero-padded so stored values compare correctly
/// as strings.
pub(crate) fn date_arg(date: Option<&str>) -> Result<String, String> {
    let parsed = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", d))?,
        None => Local::now().date_naive(),
    };
    Ok(parsed.format("%Y-%m-%d").to_string())
}
