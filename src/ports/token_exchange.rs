use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read service account key")]
    ServiceAccountKey,
    #[error("Failed to sign token assertion")]
    Signing,
    #[error("Token endpoint request failed")]
    Transport,
    #[error("Token endpoint rejected the assertion with status {status}")]
    Rejected { status: u16 },
    #[error("Token endpoint returned an unreadable response")]
    MalformedResponse,
    #[error("Token endpoint response has no access_token")]
    MissingAccessToken,
}

fn default_expires_in() -> u64 {
    3600
}

/// Response of the OAuth token endpoint. Every field is optional on the wire so
/// that a missing `access_token` surfaces as [`AuthError::MissingAccessToken`]
/// instead of a decoding failure.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[async_trait::async_trait]
pub trait TokenExchange: Send + Sync {
    /// Trades a signed JWT-bearer assertion for an access token.
    async fn exchange(&self, assertion: &str)
        -> error_stack::Result<TokenResponse, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_access_token_deserializes_to_none() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"expires_in": 3599, "token_type": "Bearer"}"#).unwrap();
        assert_eq!(response.access_token, None);
        assert_eq!(response.expires_in, 3599);
    }

    #[test]
    fn test_missing_expires_in_defaults_to_one_hour() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "ya29.abc"}"#).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("ya29.abc"));
        assert_eq!(response.expires_in, 3600);
    }
}
