// ── Core error types ──
//
// User-facing errors from glinet-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<glinet_api::Error>` impl
// folds transport-layer errors into the categories the session policy
// works with.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// Why a remote call produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The router did not answer in time.
    Timeout,
    /// The router rejected the session token.
    TokenRejected,
    /// The router could not be reached.
    Connection,
    /// The router answered with an error status.
    NonZero,
    /// Anything else (malformed response, unexpected shape).
    Other,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    /// The router could not be set up yet; retrying later may succeed.
    #[error("Router not ready: {reason}")]
    NotReady { reason: String },

    /// Credentials are missing or were rejected. Fatal until reconfigured.
    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    /// One remote call failed; the session stays usable.
    #[error("{operation} failed ({kind}): {message}")]
    Transient {
        operation: String,
        kind: FailureKind,
        message: String,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation} ({reason})")]
    Unsupported { operation: String, reason: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Classify a failed remote call made as part of `operation`.
    pub fn transient(operation: impl Into<String>, err: &glinet_api::Error) -> Self {
        Self::Transient {
            operation: operation.into(),
            kind: failure_kind(err),
            message: err.to_string(),
        }
    }

    /// The failure category, if this is a transient remote failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Transient { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Map a transport error onto the four categories the session cares about.
pub fn failure_kind(err: &glinet_api::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_token_error() {
        FailureKind::TokenRejected
    } else if err.is_connection() {
        FailureKind::Connection
    } else if err.is_non_zero() {
        FailureKind::NonZero
    } else {
        FailureKind::Other
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<glinet_api::Error> for CoreError {
    fn from(err: glinet_api::Error) -> Self {
        match err {
            glinet_api::Error::Authentication { message } => CoreError::AuthFailed { message },
            glinet_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ref other => CoreError::transient("request", other),
        }
    }
}
