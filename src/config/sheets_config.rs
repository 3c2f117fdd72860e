use serde::Deserialize;

use crate::domain::sheets::{a1_notation::SheetRange, ranges};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Deserialize, Debug, Clone)]
pub struct SpreadsheetConfig {
    /// Path to the service-account JSON key.
    pub priv_key: Box<str>,
    pub spreadsheet_id: Box<str>,
    /// Overrides the `token_uri` found in the key file.
    #[serde(default)]
    pub token_uri: Option<Box<str>>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Box<str>,
    #[serde(default)]
    pub ranges: SheetRangesConfig,
}

fn default_api_base_url() -> Box<str> {
    DEFAULT_API_BASE_URL.into()
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SheetRangesConfig {
    pub config: SheetRange,
    pub licenses: SheetRange,
    pub active_license: SheetRange,
    pub license_server: SheetRange,
}

impl Default for SheetRangesConfig {
    fn default() -> Self {
        SheetRangesConfig {
            config: SheetRange::new(ranges::config::SHEET, ranges::config::RO_VALUES),
            licenses: SheetRange::new(ranges::licenses::SHEET, ranges::licenses::RO_LIST),
            active_license: SheetRange::new(ranges::licenses::SHEET, ranges::licenses::RW_ACTIVE),
            license_server: SheetRange::new(ranges::licenses::SHEET, ranges::licenses::RO_SERVER),
        }
    }
}
