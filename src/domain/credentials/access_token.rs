use std::time::Duration;

use tokio::time::Instant;

/// Subtracted from the lifetime reported by the token endpoint so that no
/// caller is handed a token that expires mid-request.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(300);

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    bearer: String,
    usable_until: Instant,
}

impl AccessToken {
    /// Builds a token from an endpoint response received at `issued_at`.
    /// Lifetimes shorter than the safety margin yield a token that is already stale.
    /// `None` when the lifetime runs past what the clock can represent.
    pub fn issued_at(bearer: String, expires_in: Duration, issued_at: Instant) -> Option<Self> {
        let usable_until = issued_at.checked_add(expires_in.saturating_sub(SAFETY_MARGIN))?;
        Some(AccessToken {
            bearer,
            usable_until,
        })
    }

    pub fn bearer(&self) -> &str {
        &self.bearer
    }

    pub fn usable_until(&self) -> Instant {
        self.usable_until
    }

    pub fn is_usable_at(&self, now: Instant) -> bool {
        now < self.usable_until
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("bearer", &"<redacted>")
            .field("usable_until", &self.usable_until)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_until_subtracts_safety_margin() {
        let now = Instant::now();
        let token = AccessToken::issued_at("t".to_string(), Duration::from_secs(3600), now).unwrap();
        assert_eq!(token.usable_until(), now + Duration::from_secs(3300));
    }

    #[test]
    fn test_usable_right_up_to_the_boundary() {
        let now = Instant::now();
        let token = AccessToken::issued_at("t".to_string(), Duration::from_secs(3600), now).unwrap();
        assert!(token.is_usable_at(now));
        assert!(token.is_usable_at(now + Duration::from_secs(3299)));
        assert!(!token.is_usable_at(now + Duration::from_secs(3300)));
    }

    #[test]
    fn test_short_lifetime_is_immediately_stale() {
        let now = Instant::now();
        let token = AccessToken::issued_at("t".to_string(), Duration::from_secs(120), now).unwrap();
        assert_eq!(token.usable_until(), now);
        assert!(!token.is_usable_at(now));
    }

    #[test]
    fn test_unrepresentable_lifetime_is_rejected() {
        let token = AccessToken::issued_at(
            "t".to_string(),
            Duration::from_secs(u64::MAX),
            Instant::now(),
        );
        assert_eq!(token, None);
    }

    #[test]
    fn test_debug_hides_bearer() {
        let token = AccessToken::issued_at(
            "ya29.secret".to_string(),
            Duration::from_secs(3600),
            Instant::now(),
        )
        .unwrap();
        assert!(!format!("{:?}", token).contains("ya29.secret"));
    }
}
