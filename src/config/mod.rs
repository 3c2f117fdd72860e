pub mod app_config;
pub mod sheets_config;

pub use app_config::{AppConfig, ConfigError};
pub use sheets_config::{SheetRangesConfig, SpreadsheetConfig};
