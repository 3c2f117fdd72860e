use error_stack::{report, ResultExt};
use reqwest::Url;
use tracing::instrument;

use crate::domain::sheets::{a1_notation::A1Notation, value_range::ValueRange};
use crate::ports::spreadsheet_values::{FetchError, SpreadsheetValues};

pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// REST client for `spreadsheets.values` of a single spreadsheet.
pub struct SheetsValuesClient {
    client: reqwest::Client,
    api_base_url: String,
    spreadsheet_id: String,
}

impl std::fmt::Debug for SheetsValuesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SheetsValuesClient {{ spreadsheet_id: {} }}",
            self.spreadsheet_id
        )
    }
}

impl SheetsValuesClient {
    pub fn new(
        client: reqwest::Client,
        api_base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
    ) -> Self {
        SheetsValuesClient {
            client,
            api_base_url: api_base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// `<base>/<spreadsheet_id>/values/<range>`, each part percent-encoded as a
    /// single path segment.
    pub fn values_url(&self, range: &A1Notation) -> error_stack::Result<Url, FetchError> {
        let mut url = Url::parse(&self.api_base_url)
            .change_context(FetchError::Transport)
            .attach_printable_lazy(|| format!("Invalid API base URL {}", self.api_base_url))?;

        url.path_segments_mut()
            .map_err(|_| {
                report!(FetchError::Transport)
                    .attach_printable(format!("API base URL {} cannot be a base", self.api_base_url))
            })?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range.as_ref());

        Ok(url)
    }
}

#[async_trait::async_trait]
impl SpreadsheetValues for SheetsValuesClient {
    #[instrument(skip(bearer))]
    async fn read_range(
        &self,
        bearer: &str,
        range: &A1Notation,
    ) -> error_stack::Result<ValueRange, FetchError> {
        let response = self
            .client
            .get(self.values_url(range)?)
            .bearer_auth(bearer)
            .send()
            .await
            .change_context(FetchError::Transport)
            .attach_printable_lazy(|| format!("Failed to fetch range {}", range))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(report!(FetchError::Rejected {
                status: status.as_u16()
            }))
            .attach_printable(body)
            .attach_printable_lazy(|| format!("Failed to fetch range {}", range));
        }

        response
            .json::<ValueRange>()
            .await
            .change_context(FetchError::MalformedResponse)
            .attach_printable_lazy(|| format!("Failed to decode values for range {}", range))
    }

    #[instrument(skip(bearer))]
    async fn write_range(
        &self,
        bearer: &str,
        range: &A1Notation,
        value_range: ValueRange,
    ) -> error_stack::Result<(), FetchError> {
        let response = self
            .client
            .put(self.values_url(range)?)
            .query(&[("valueInputOption", VALUE_INPUT_OPTION)])
            .bearer_auth(bearer)
            .json(&value_range)
            .send()
            .await
            .change_context(FetchError::Transport)
            .attach_printable_lazy(|| format!("Failed to write range {}", range))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(report!(FetchError::Rejected {
                status: status.as_u16()
            }))
            .attach_printable(body)
            .attach_printable_lazy(|| format!("Failed to write range {}", range));
        }

        Ok(())
    }
}
