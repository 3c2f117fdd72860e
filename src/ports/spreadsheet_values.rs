use thiserror::Error;

use crate::domain::sheets::{a1_notation::A1Notation, value_range::ValueRange};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to obtain an access token")]
    Unauthorized,
    #[error("Spreadsheet request failed")]
    Transport,
    #[error("Spreadsheet API rejected the request with status {status}")]
    Rejected { status: u16 },
    #[error("Spreadsheet API returned an unreadable response")]
    MalformedResponse,
    #[error("No data found in range")]
    NoData,
}

/// Raw access to the `values` collection of one spreadsheet.
#[async_trait::async_trait]
pub trait SpreadsheetValues: Send + Sync {
    async fn read_range(
        &self,
        bearer: &str,
        range: &A1Notation,
    ) -> error_stack::Result<ValueRange, FetchError>;

    /// Overwrites `range` with `value_range`, interpreting input as if typed by a user.
    async fn write_range(
        &self,
        bearer: &str,
        range: &A1Notation,
        value_range: ValueRange,
    ) -> error_stack::Result<(), FetchError>;
}
