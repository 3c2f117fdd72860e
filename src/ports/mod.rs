pub mod spreadsheet_values;
pub mod token_exchange;

pub use spreadsheet_values::{FetchError, SpreadsheetValues};
pub use token_exchange::{AuthError, TokenExchange, TokenResponse};
