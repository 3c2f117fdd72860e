//! Access-token lifecycle: acquisition on demand, expiry tracking and a
//! self-rearming background refresh.
//!
//! The background refresh is best effort. When a renewal fails the chain stops
//! and stays stopped until a foreground [`TokenManager::ensure_token`] call has
//! to acquire a new token, which arms it again.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use error_stack::{report, ResultExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::adapters::sheets::auth::AssertionSigner;
use crate::domain::credentials::AccessToken;
use crate::ports::token_exchange::{AuthError, TokenExchange};

/// Lower bound on the wait before a background renewal, so an endpoint handing
/// out tokens shorter than the safety margin cannot spin the refresh task.
pub const MIN_BACKGROUND_REFRESH_DELAY: Duration = Duration::from_secs(30);

pub struct TokenManager {
    inner: Arc<Inner>,
}

struct Inner {
    signer: AssertionSigner,
    exchange: Arc<dyn TokenExchange>,
    // Held across acquisition: concurrent callers share one in-flight exchange.
    token: Mutex<Option<AccessToken>>,
    refresh_task: StdMutex<Option<JoinHandle<()>>>,
    stopped: CancellationToken,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TokenManager {{ signer: {:?}, stopped: {} }}",
            self.inner.signer,
            self.inner.stopped.is_cancelled()
        )
    }
}

impl TokenManager {
    pub fn new(signer: AssertionSigner, exchange: Arc<dyn TokenExchange>) -> Self {
        TokenManager {
            inner: Arc::new(Inner {
                signer,
                exchange,
                token: Mutex::new(None),
                refresh_task: StdMutex::new(None),
                stopped: CancellationToken::new(),
            }),
        }
    }

    /// Returns a bearer token that is usable right now, acquiring a new one when
    /// none is held or the held one reached its usable boundary. A failed
    /// acquisition leaves the held token untouched.
    #[instrument(skip(self))]
    pub async fn ensure_token(&self) -> error_stack::Result<String, AuthError> {
        let mut guard = self.inner.token.lock().await;

        if let Some(token) = guard.as_ref() {
            if token.is_usable_at(Instant::now()) {
                return Ok(token.bearer().to_owned());
            }
        }

        let token = self.inner.acquire().await?;
        let bearer = token.bearer().to_owned();
        let usable_until = token.usable_until();
        *guard = Some(token);
        drop(guard);

        self.schedule_background_refresh(usable_until);
        Ok(bearer)
    }

    /// Arms the refresh task to renew the token at `usable_until`, replacing
    /// any task armed before. Does nothing once the manager is shut down.
    pub fn schedule_background_refresh(&self, usable_until: Instant) {
        if self.inner.stopped.is_cancelled() {
            return;
        }

        let handle = tokio::spawn(Arc::clone(&self.inner).refresh_chain(usable_until));

        let previous = self
            .inner
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);

        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Stops the background refresh. A renewal already talking to the token
    /// endpoint finishes and stores its token, but nothing is armed afterwards.
    /// Safe to call any number of times.
    pub fn shutdown(&self) {
        if self.inner.stopped.is_cancelled() {
            return;
        }

        self.inner.stopped.cancel();
        let _detached = self
            .inner
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        info!("Token refresh stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.is_cancelled()
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.inner
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// The token currently held, usable or not.
    pub async fn current_token(&self) -> Option<AccessToken> {
        self.inner.token.lock().await.clone()
    }
}

impl Drop for TokenManager {
    fn drop(&mut self) {
        self.inner.stopped.cancel();
    }
}

impl Inner {
    #[instrument(skip(self))]
    async fn acquire(&self) -> error_stack::Result<AccessToken, AuthError> {
        let assertion = self.signer.sign()?;
        let response = self.exchange.exchange(&assertion).await?;

        let bearer = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| report!(AuthError::MissingAccessToken))?;

        let expires_in = response.expires_in;
        info!(
            expires_in,
            token_type = response.token_type.as_deref().unwrap_or("Bearer"),
            "Obtained access token"
        );

        AccessToken::issued_at(bearer, Duration::from_secs(expires_in), Instant::now())
            .ok_or_else(|| report!(AuthError::MalformedResponse))
            .attach_printable_lazy(|| format!("expires_in of {}s is out of range", expires_in))
    }

    async fn renew(&self) -> error_stack::Result<Instant, AuthError> {
        let mut guard = self.token.lock().await;
        let token = self.acquire().await?;
        let usable_until = token.usable_until();
        *guard = Some(token);
        Ok(usable_until)
    }

    async fn refresh_chain(self: Arc<Self>, mut usable_until: Instant) {
        loop {
            let fire_at = usable_until.max(Instant::now() + MIN_BACKGROUND_REFRESH_DELAY);

            tokio::select! {
                biased;
                _ = self.stopped.cancelled() => return,
                _ = tokio::time::sleep_until(fire_at) => {}
            }

            match self.renew().await {
                Ok(next) => {
                    info!("Token refreshed in background");
                    if self.stopped.is_cancelled() {
                        return;
                    }
                    usable_until = next;
                }
                Err(report) => {
                    error!("Error refreshing token in background: {:?}", report);
                    return;
                }
            }
        }
    }
}
