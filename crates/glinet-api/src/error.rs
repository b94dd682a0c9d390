use thiserror::Error;

/// JSON-RPC error code the router answers with when the session id
/// is missing, expired, or was issued before a reboot.
pub const ACCESS_DENIED: i64 = -32000;

/// Top-level error type for the `glinet-api` crate.
///
/// Every remote call resolves to one of these. `glinet-core` only cares
/// about four buckets (connection, timeout, token rejected, non-zero
/// status); the classifiers below answer those questions so callers
/// never match on transport details.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login was refused (wrong password, unknown user, locked account).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The router refused the session id attached to a call.
    #[error("Session token rejected by router: {message}")]
    TokenRejected { message: String },

    /// A call was attempted before any session id was obtained.
    #[error("No session token -- login required")]
    NotLoggedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Router answered with a non-success HTTP status.
    #[error("HTTP {status} from router")]
    Http { status: u16 },

    // ── JSON-RPC ────────────────────────────────────────────────────
    /// Router answered the call, but with an error object or a non-zero
    /// `err_code` in the result.
    #[error("Router returned error code {code}: {message}")]
    NonZero { code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the router rejected the current session id and a
    /// fresh login might resolve it.
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::TokenRejected { .. } | Self::NotLoggedIn)
    }

    /// Returns `true` if the request did not complete in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the router could not be reached at all.
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_request(),
            Self::Tls(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if the router answered with an error status.
    pub fn is_non_zero(&self) -> bool {
        matches!(self, Self::NonZero { .. } | Self::Http { .. })
    }

    /// Returns `true` if the router explicitly refused the credentials,
    /// as opposed to being unreachable or misbehaving.
    pub fn is_credentials_rejected(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::TokenRejected { .. })
    }

    /// Returns `true` if retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        self.is_timeout() || self.is_connection() || matches!(self, Self::Http { status } if *status >= 500)
    }
}
