#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use error_stack::report;
use serde_json::Value;

use sheets_credential_broker::adapters::sheets::auth::{
    parse_service_account_key, AssertionSigner,
};
use sheets_credential_broker::config::SheetRangesConfig;
use sheets_credential_broker::domain::sheets::{a1_notation::A1Notation, value_range::ValueRange};
use sheets_credential_broker::{
    AuthError, CredentialStore, FetchError, ServiceAccountKey, SpreadsheetValues, TokenExchange,
    TokenManager, TokenResponse,
};

pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub fn fixture_key() -> ServiceAccountKey {
    let contents = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service_account.json"
    ))
    .unwrap();
    parse_service_account_key(&contents).unwrap()
}

pub fn fixture_public_key() -> Vec<u8> {
    std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/public_key.pem"
    ))
    .unwrap()
}

pub fn token(access_token: &str, expires_in: u64) -> TokenResponse {
    TokenResponse {
        access_token: Some(access_token.to_string()),
        expires_in,
        token_type: Some("Bearer".to_string()),
    }
}

pub fn token_without_access_token() -> TokenResponse {
    TokenResponse {
        access_token: None,
        expires_in: 3600,
        token_type: Some("Bearer".to_string()),
    }
}

pub enum Scripted {
    Respond(TokenResponse),
    Reject(u16),
}

/// Token endpoint double that answers from a script, then falls back to
/// numbered tokens once the script runs out.
#[derive(Default)]
pub struct StubTokenExchange {
    script: Mutex<VecDeque<Scripted>>,
    assertions: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl StubTokenExchange {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripted(script: Vec<Scripted>) -> Arc<Self> {
        let stub = Self::default();
        *stub.script.lock().unwrap() = script.into();
        Arc::new(stub)
    }

    pub fn push(&self, step: Scripted) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn assertions(&self) -> Vec<String> {
        self.assertions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TokenExchange for StubTokenExchange {
    async fn exchange(
        &self,
        assertion: &str,
    ) -> error_stack::Result<TokenResponse, AuthError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.assertions.lock().unwrap().push(assertion.to_string());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Reject(status)) => Err(report!(AuthError::Rejected { status })),
            None => Ok(token(&format!("token-{}", call), 3600)),
        }
    }
}

/// In-memory spreadsheet keyed by the A1 notation of each range.
#[derive(Default)]
pub struct InMemorySheet {
    ranges: Mutex<HashMap<String, ValueRange>>,
    reads: Mutex<Vec<(String, String)>>,
    writes: Mutex<Vec<(String, String, ValueRange)>>,
    failing: Mutex<Option<u16>>,
}

impl InMemorySheet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_rows(&self, range: &str, rows: Vec<Vec<Value>>) {
        self.ranges.lock().unwrap().insert(
            range.to_string(),
            ValueRange {
                range: Some(range.to_string()),
                major_dimension: Some("ROWS".to_string()),
                values: Some(rows),
            },
        );
    }

    /// A range the API reports without any `values` key.
    pub fn set_empty(&self, range: &str) {
        self.ranges.lock().unwrap().insert(
            range.to_string(),
            ValueRange {
                range: Some(range.to_string()),
                major_dimension: Some("ROWS".to_string()),
                values: None,
            },
        );
    }

    pub fn fail_with(&self, status: u16) {
        *self.failing.lock().unwrap() = Some(status);
    }

    pub fn reads_of(&self, range: &str) -> usize {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .filter(|(read, _)| read == range)
            .count()
    }

    pub fn bearers(&self) -> Vec<String> {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .map(|(_, bearer)| bearer.clone())
            .collect()
    }

    pub fn writes(&self) -> Vec<(String, String, ValueRange)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpreadsheetValues for InMemorySheet {
    async fn read_range(
        &self,
        bearer: &str,
        range: &A1Notation,
    ) -> error_stack::Result<ValueRange, FetchError> {
        if let Some(status) = *self.failing.lock().unwrap() {
            return Err(report!(FetchError::Rejected { status }));
        }

        self.reads
            .lock()
            .unwrap()
            .push((range.to_string(), bearer.to_string()));

        Ok(self
            .ranges
            .lock()
            .unwrap()
            .get(range.as_ref())
            .cloned()
            .unwrap_or_else(|| ValueRange {
                range: Some(range.to_string()),
                major_dimension: Some("ROWS".to_string()),
                values: None,
            }))
    }

    async fn write_range(
        &self,
        bearer: &str,
        range: &A1Notation,
        value_range: ValueRange,
    ) -> error_stack::Result<(), FetchError> {
        if let Some(status) = *self.failing.lock().unwrap() {
            return Err(report!(FetchError::Rejected { status }));
        }

        self.writes.lock().unwrap().push((
            range.to_string(),
            bearer.to_string(),
            value_range.clone(),
        ));
        self.ranges
            .lock()
            .unwrap()
            .insert(range.to_string(), value_range);
        Ok(())
    }
}

pub fn token_manager(exchange: Arc<StubTokenExchange>) -> TokenManager {
    TokenManager::new(AssertionSigner::new(fixture_key(), TOKEN_URI), exchange)
}

pub fn store(
    exchange: Arc<StubTokenExchange>,
    sheet: Arc<InMemorySheet>,
) -> CredentialStore {
    CredentialStore::new(
        SheetRangesConfig::default(),
        token_manager(exchange),
        sheet,
    )
}
