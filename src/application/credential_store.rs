use std::sync::Arc;

use error_stack::{report, ResultExt};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::adapters::sheets::{
    auth::{read_service_account_key, AssertionSigner, GoogleTokenEndpoint},
    http_client,
    spreadsheet_client::SheetsValuesClient,
    value_range_factory::ValueRangeFactory,
};
use crate::application::token_lifecycle::TokenManager;
use crate::config::sheets_config::{SheetRangesConfig, SpreadsheetConfig, DEFAULT_TOKEN_URI};
use crate::domain::credentials::{ConfigRecord, LicenseEntry, LicenseRows};
use crate::domain::sheets::{
    a1_notation::{SheetRange, ToA1Notation},
    value_range::{cell_at, ValueRange},
};
use crate::ports::spreadsheet_values::{FetchError, SpreadsheetValues};
use crate::ports::token_exchange::AuthError;

/// Spreadsheet-backed credential broker: the config triple, the license list,
/// the active license and the license server address.
pub struct CredentialStore {
    ranges: SheetRangesConfig,
    tokens: TokenManager,
    values: Arc<dyn SpreadsheetValues>,
    config_cache: RwLock<Option<ConfigRecord>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CredentialStore {{ ranges: {:?}, tokens: {:?} }}",
            self.ranges, self.tokens
        )
    }
}

impl CredentialStore {
    pub fn new(
        ranges: SheetRangesConfig,
        tokens: TokenManager,
        values: Arc<dyn SpreadsheetValues>,
    ) -> Self {
        CredentialStore {
            ranges,
            tokens,
            values,
            config_cache: RwLock::new(None),
        }
    }

    /// Wires the Google token endpoint and the Sheets REST client from config.
    /// The token URI comes from the config, then the key file, then Google's default.
    #[instrument(name = "CredentialStore::from_config")]
    pub async fn from_config(
        config: SpreadsheetConfig,
    ) -> error_stack::Result<Self, AuthError> {
        let key = read_service_account_key(&config.priv_key).await?;

        let token_uri = config
            .token_uri
            .as_deref()
            .map(str::to_owned)
            .or_else(|| key.token_uri.clone())
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        let client = http_client::http_client().change_context(AuthError::Transport)?;
        let exchange = Arc::new(GoogleTokenEndpoint::new(client.clone(), token_uri.as_str()));
        let signer = AssertionSigner::new(key, token_uri);
        let values = Arc::new(SheetsValuesClient::new(
            client,
            config.api_base_url.as_ref(),
            config.spreadsheet_id.as_ref(),
        ));

        Ok(CredentialStore::new(
            config.ranges,
            TokenManager::new(signer, exchange),
            values,
        ))
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    async fn bearer(&self) -> error_stack::Result<String, FetchError> {
        self.tokens
            .ensure_token()
            .await
            .change_context(FetchError::Unauthorized)
    }

    /// Reads the config triple once; later calls are served from memory for the
    /// lifetime of the store.
    #[instrument(skip(self))]
    pub async fn get_config(&self) -> error_stack::Result<ConfigRecord, FetchError> {
        let cache = {
            // -- LOCK READ --
            let guard = self.config_cache.read().await;
            guard.clone()
            // -- END LOCK READ --
        };

        if let Some(record) = cache {
            return Ok(record);
        }

        let record = self
            .fetch_config()
            .await
            .inspect_err(|report| error!("Error fetching config: {:?}", report))?;

        {
            // -- LOCK WRITE --
            let mut guard = self.config_cache.write().await;
            guard.replace(record.clone());
            // -- END LOCK WRITE --
        }

        Ok(record)
    }

    async fn fetch_config(&self) -> error_stack::Result<ConfigRecord, FetchError> {
        let rows = self
            .read_rows(&self.ranges.config)
            .await?
            .ok_or_else(|| report!(FetchError::NoData))
            .attach_printable_lazy(|| format!("No values in config range {}", self.ranges.config))?;

        Ok(ConfigRecord::from_rows(&rows))
    }

    /// Every license row up to the first row with both account and key empty.
    #[instrument(skip(self))]
    pub async fn list_licenses(&self) -> error_stack::Result<Vec<LicenseEntry>, FetchError> {
        self.read_rows(&self.ranges.licenses)
            .await
            .map(|rows| LicenseRows::new(&rows.unwrap_or_default()).collect())
            .inspect_err(|report| error!("Error reading license list: {:?}", report))
    }

    /// The active license; both fields are empty when the row is blank.
    #[instrument(skip(self))]
    pub async fn get_active_license(&self) -> error_stack::Result<LicenseEntry, FetchError> {
        self.read_rows(&self.ranges.active_license)
            .await
            .map(|rows| LicenseEntry::active_from_rows(rows.as_deref()))
            .inspect_err(|report| error!("Error retrieving active license: {:?}", report))
    }

    /// Overwrites the whole active-license row.
    #[instrument(skip(self, license_key))]
    pub async fn set_active_license(
        &self,
        account: &str,
        license_key: &str,
    ) -> error_stack::Result<(), FetchError> {
        let result = self
            .write_row(&self.ranges.active_license, &[account, license_key])
            .await;

        match &result {
            Ok(()) => info!("Active license set successfully"),
            Err(report) => error!("Error setting active license: {:?}", report),
        }

        result
    }

    /// First cell of the license-server range, read on every call.
    #[instrument(skip(self))]
    pub async fn get_license_server(&self) -> error_stack::Result<Option<String>, FetchError> {
        self.read_rows(&self.ranges.license_server)
            .await
            .map(|rows| {
                rows.as_deref()
                    .and_then(|rows| rows.first())
                    .and_then(|row| cell_at(row, 0))
            })
            .inspect_err(|report| error!("Error retrieving license server: {:?}", report))
    }

    async fn read_rows(
        &self,
        range: &SheetRange,
    ) -> error_stack::Result<Option<Vec<Vec<Value>>>, FetchError> {
        let bearer = self.bearer().await?;
        let value_range = self
            .values
            .read_range(&bearer, &range.to_a1_notation())
            .await?;
        Ok(value_range.values)
    }

    async fn write_row(
        &self,
        range: &SheetRange,
        row: &[&str],
    ) -> error_stack::Result<(), FetchError> {
        let bearer = self.bearer().await?;
        self.values
            .write_range(&bearer, &range.to_a1_notation(), ValueRange::from_row(row))
            .await
    }

    /// Stops the background token refresh. Accessors keep working afterwards,
    /// acquiring tokens on demand.
    pub fn shutdown(&self) {
        self.tokens.shutdown();
    }
}
