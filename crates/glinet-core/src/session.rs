// ── Router session ──
//
// Owns the API handle and the session token. Every remote call goes
// through `invoke` (or its `Option`-returning twin `call`), which is the
// single place where failures are classified, the token-error and
// connection-error flags are maintained, and renewal is triggered.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use glinet_api::RouterApi;
use secrecy::SecretString;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::config::RouterConfig;
use crate::error::{CoreError, FailureKind, failure_kind};

/// Result of the most recent login attempt, shared with callers that
/// waited on it instead of logging in themselves.
#[derive(Debug, Clone)]
enum RenewalOutcome {
    Renewed,
    Rejected(String),
    Failed { kind: FailureKind, message: String },
}

impl RenewalOutcome {
    fn to_result(&self) -> Result<(), CoreError> {
        match self {
            Self::Renewed => Ok(()),
            Self::Rejected(message) => Err(CoreError::AuthFailed {
                message: message.clone(),
            }),
            Self::Failed { kind, message } => Err(CoreError::Transient {
                operation: "renew_token".into(),
                kind: *kind,
                message: message.clone(),
            }),
        }
    }
}

struct RenewalState {
    generation: u64,
    outcome: RenewalOutcome,
}

/// One authenticated session against one router.
pub struct RouterSession {
    api: Arc<dyn RouterApi>,
    username: String,
    password: Option<SecretString>,
    token: watch::Sender<Option<SecretString>>,
    authenticated: AtomicBool,
    token_error: AtomicBool,
    connect_error: AtomicBool,
    renewal: Mutex<RenewalState>,
    /// Mirrors `renewal.generation` so callers can snapshot it before
    /// queueing on the lock.
    renewal_generation: AtomicU64,
}

impl RouterSession {
    pub fn new(api: Arc<dyn RouterApi>, config: &RouterConfig) -> Self {
        Self {
            api,
            username: config.username.clone(),
            password: config.password.clone(),
            token: watch::channel(config.token.clone()).0,
            authenticated: AtomicBool::new(false),
            token_error: AtomicBool::new(false),
            connect_error: AtomicBool::new(false),
            renewal: Mutex::new(RenewalState {
                generation: 0,
                outcome: RenewalOutcome::Renewed,
            }),
            renewal_generation: AtomicU64::new(0),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Establish the session: reuse a stored token optimistically, else
    /// log in with the configured credentials.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        let stored = self.token.borrow().clone();
        if let Some(token) = stored {
            debug!("reusing stored session token");
            self.api.set_token(Some(token));
            self.authenticated.store(true, Ordering::Release);
            return Ok(());
        }

        if self.password.is_none() {
            return Err(CoreError::AuthFailed {
                message: "no password or stored token configured".into(),
            });
        }

        match self.renew_token().await {
            Err(CoreError::Transient { message, .. }) => Err(CoreError::NotReady { reason: message }),
            other => other,
        }
    }

    /// Log in again with the stored credentials.
    ///
    /// Single-flight: a caller that queued behind an in-progress renewal
    /// gets that renewal's outcome instead of logging in a second time.
    pub async fn renew_token(&self) -> Result<(), CoreError> {
        let observed = self.renewal_generation.load(Ordering::Acquire);
        let mut state = self.renewal.lock().await;
        if state.generation != observed {
            debug!("token renewal completed while waiting, reusing outcome");
            return state.outcome.to_result();
        }

        let outcome = self.login().await;
        state.generation += 1;
        state.outcome = outcome;
        self.renewal_generation
            .store(state.generation, Ordering::Release);
        state.outcome.to_result()
    }

    async fn login(&self) -> RenewalOutcome {
        let Some(password) = &self.password else {
            self.authenticated.store(false, Ordering::Release);
            return RenewalOutcome::Rejected("no password configured for token renewal".into());
        };

        match self.api.login(&self.username, password).await {
            Ok(token) => {
                info!(username = %self.username, "session token renewed");
                self.token.send_replace(Some(token));
                self.authenticated.store(true, Ordering::Release);
                RenewalOutcome::Renewed
            }
            Err(e) if e.is_credentials_rejected() => {
                warn!(username = %self.username, error = %e, "router rejected credentials");
                self.authenticated.store(false, Ordering::Release);
                RenewalOutcome::Rejected(e.to_string())
            }
            Err(e) => {
                debug!(error = %e, "login did not complete");
                RenewalOutcome::Failed {
                    kind: failure_kind(&e),
                    message: e.to_string(),
                }
            }
        }
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Run one remote operation, returning `Ok(None)` if it failed.
    ///
    /// The only error that escapes is `AuthFailed` from a renewal; every
    /// remote failure is logged, recorded in the session flags and turned
    /// into "no data".
    pub async fn call<T, F, Fut>(&self, operation: &str, f: F) -> Result<Option<T>, CoreError>
    where
        F: FnOnce(Arc<dyn RouterApi>) -> Fut,
        Fut: Future<Output = Result<T, glinet_api::Error>>,
    {
        match self.invoke(operation, f).await {
            Ok(value) => Ok(Some(value)),
            Err(e @ CoreError::AuthFailed { .. }) => Err(e),
            Err(_) => Ok(None),
        }
    }

    /// Run one remote operation, returning the classified error on
    /// failure. Used by commands, whose callers want to know why.
    pub async fn invoke<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Arc<dyn RouterApi>) -> Fut,
        Fut: Future<Output = Result<T, glinet_api::Error>>,
    {
        if self.token_error.load(Ordering::Acquire) || self.connect_error.load(Ordering::Acquire)
        {
            if let Err(e) = self.renew_token().await {
                if !matches!(e, CoreError::AuthFailed { .. }) {
                    self.connect_error.store(true, Ordering::Release);
                    warn!(operation, error = %e, "could not re-establish session");
                }
                return Err(e);
            }
        }

        match f(Arc::clone(&self.api)).await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => Err(self.record_failure(operation, &e)),
        }
    }

    fn record_success(&self) {
        if self.token_error.swap(false, Ordering::AcqRel) {
            info!("new session token accepted by router");
        }
        if self.connect_error.swap(false, Ordering::AcqRel) {
            info!("reconnected to router");
        }
    }

    fn record_failure(&self, operation: &str, err: &glinet_api::Error) -> CoreError {
        let kind = failure_kind(err);
        self.connect_error.store(true, Ordering::Release);
        match kind {
            FailureKind::Timeout => {
                error!(operation, "router did not respond in time");
            }
            FailureKind::TokenRejected => {
                self.token_error.store(true, Ordering::Release);
                warn!(operation, "session token rejected, renewing before next call");
            }
            FailureKind::NonZero => {
                error!(operation, error = %err, "router responded with an error code");
            }
            FailureKind::Connection | FailureKind::Other => {
                error!(operation, error = %err, "router call failed");
            }
        }
        CoreError::transient(operation, err)
    }

    // ── State accessors ──────────────────────────────────────────────

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    pub fn has_token_error(&self) -> bool {
        self.token_error.load(Ordering::Acquire)
    }

    pub fn has_connection_error(&self) -> bool {
        self.connect_error.load(Ordering::Acquire)
    }

    /// The current token, published on every renewal so the owner can
    /// persist it.
    pub fn subscribe_token(&self) -> watch::Receiver<Option<SecretString>> {
        self.token.subscribe()
    }

    pub fn current_token(&self) -> Option<SecretString> {
        self.token.borrow().clone()
    }
}
