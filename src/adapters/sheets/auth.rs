use error_stack::{report, ResultExt};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::credentials::ServiceAccountKey;
use crate::ports::token_exchange::{AuthError, TokenExchange, TokenResponse};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[instrument]
pub async fn read_service_account_key(
    priv_key_path: &str,
) -> error_stack::Result<ServiceAccountKey, AuthError> {
    let contents = tokio::fs::read_to_string(priv_key_path)
        .await
        .change_context(AuthError::ServiceAccountKey)
        .attach_printable_lazy(|| {
            format!(
                "Could not read service account key at '{}'",
                priv_key_path
            )
        })?;

    parse_service_account_key(&contents)
        .attach_printable_lazy(|| format!("Key file: {}", priv_key_path))
}

pub fn parse_service_account_key(
    contents: &str,
) -> error_stack::Result<ServiceAccountKey, AuthError> {
    serde_json::from_str::<ServiceAccountKey>(contents)
        .map(ServiceAccountKey::normalized)
        .change_context(AuthError::ServiceAccountKey)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Builds RS256-signed JWT-bearer assertions for one service account.
pub struct AssertionSigner {
    key: ServiceAccountKey,
    audience: String,
    scope: String,
}

impl std::fmt::Debug for AssertionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AssertionSigner {{ issuer: {}, audience: {} }}",
            self.key.client_email, self.audience
        )
    }
}

impl AssertionSigner {
    pub fn new(key: ServiceAccountKey, audience: impl Into<String>) -> Self {
        AssertionSigner {
            key,
            audience: audience.into(),
            scope: SPREADSHEETS_SCOPE.to_string(),
        }
    }

    pub fn claims_at(&self, now: i64) -> AssertionClaims {
        AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }

    pub fn sign(&self) -> error_stack::Result<String, AuthError> {
        self.sign_at(chrono::Utc::now().timestamp())
    }

    /// The PEM is parsed on every call, so a malformed key only fails when a
    /// token is actually needed.
    pub fn sign_at(&self, now: i64) -> error_stack::Result<String, AuthError> {
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .change_context(AuthError::Signing)
            .attach_printable_lazy(|| {
                format!(
                    "Private key of {} is not a valid RSA PEM",
                    self.key.client_email
                )
            })?;

        jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &self.claims_at(now),
            &encoding_key,
        )
        .change_context(AuthError::Signing)
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    assertion: &'a str,
}

/// The Google OAuth token endpoint.
pub struct GoogleTokenEndpoint {
    client: reqwest::Client,
    token_uri: String,
}

impl std::fmt::Debug for GoogleTokenEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoogleTokenEndpoint {{ token_uri: {} }}", self.token_uri)
    }
}

impl GoogleTokenEndpoint {
    pub fn new(client: reqwest::Client, token_uri: impl Into<String>) -> Self {
        GoogleTokenEndpoint {
            client,
            token_uri: token_uri.into(),
        }
    }
}

#[async_trait::async_trait]
impl TokenExchange for GoogleTokenEndpoint {
    #[instrument(skip(assertion))]
    async fn exchange(
        &self,
        assertion: &str,
    ) -> error_stack::Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(&self.token_uri)
            .json(&TokenRequest {
                grant_type: JWT_BEARER_GRANT_TYPE,
                assertion,
            })
            .send()
            .await
            .change_context(AuthError::Transport)
            .attach_printable_lazy(|| format!("POST {}", self.token_uri))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(report!(AuthError::Rejected {
                status: status.as_u16()
            }))
            .attach_printable(body);
        }

        response
            .json::<TokenResponse>()
            .await
            .change_context(AuthError::MalformedResponse)
    }
}
