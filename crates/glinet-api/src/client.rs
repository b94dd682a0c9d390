// JSON-RPC HTTP client
//
// Wraps `reqwest::Client` with the router's `/rpc` envelope. Every call is a
// POST of `{"jsonrpc":"2.0","id":N,"method":"call","params":[sid, module,
// function, args]}`; the router answers with either `result` or `error`.
// Endpoint groups (system, clients, wifi, vpn, multiwan) are implemented as
// inherent methods in separate files so this module stays focused on
// transport mechanics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::error::{ACCESS_DENIED, Error};
use crate::transport::TransportConfig;

/// Path of the JSON-RPC endpoint, relative to the router root.
pub const API_PATH: &str = "/rpc";

/// JSON-RPC response envelope. Exactly one of `result` / `error` is set.
#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Raw HTTP client for a GL-iNet router's JSON-RPC API.
///
/// Holds the session id (`sid`) obtained from [`login`](Self::login) and
/// attaches it to every `call`. The id can also be injected directly with
/// [`set_sid`](Self::set_sid) when a previously persisted token is reused.
pub struct GlinetClient {
    http: reqwest::Client,
    base_url: Url,
    rpc_url: Url,
    sid: RwLock<Option<SecretString>>,
    next_id: AtomicU64,
    timeout_secs: u64,
}

impl GlinetClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the router root, e.g. `http://192.168.8.1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::with_client(http, base_url)?;
        client.timeout_secs = transport.timeout_secs();
        Ok(client)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        let rpc_url = base_url.join(API_PATH)?;
        Ok(Self {
            http,
            base_url,
            rpc_url,
            sid: RwLock::new(None),
            next_id: AtomicU64::new(1),
            timeout_secs: TransportConfig::default().timeout_secs(),
        })
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session id ───────────────────────────────────────────────────

    /// Replace the session id attached to subsequent calls.
    pub fn set_sid(&self, sid: Option<SecretString>) {
        *self.sid.write().unwrap_or_else(PoisonError::into_inner) = sid;
    }

    /// Whether a session id is currently held.
    pub fn has_sid(&self) -> bool {
        self.sid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn current_sid(&self) -> Result<String, Error> {
        self.sid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|sid| sid.expose_secret().to_owned())
            .ok_or(Error::NotLoggedIn)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Invoke `module.function(args)` with the current session id and
    /// deserialize the `result` member.
    pub async fn call<T: DeserializeOwned>(
        &self,
        module: &str,
        function: &str,
        args: Value,
    ) -> Result<T, Error> {
        let sid = self.current_sid()?;
        debug!(module, function, "rpc call");
        let result = self
            .request("call", json!([sid, module, function, args]))
            .await?;
        check_err_code(&result)?;
        decode(result)
    }

    /// Send one JSON-RPC request and return its `result` member.
    pub(crate) async fn request(&self, method: &str, params: Value) -> Result<Value, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        trace!(id, method, "POST {}", self.rpc_url);

        let resp = self
            .http
            .post(self.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.parse_envelope(resp).await
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn parse_envelope(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::TokenRejected {
                message: format!("HTTP {status}"),
            });
        }

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        let envelope: RpcResponse = serde_json::from_str(&body).map_err(|e| {
            let preview = body
                .char_indices()
                .nth(200)
                .map_or(body.as_str(), |(end, _)| &body[..end]);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        if let Some(err) = envelope.error {
            return Err(if err.code == ACCESS_DENIED {
                Error::TokenRejected {
                    message: err.message,
                }
            } else {
                Error::NonZero {
                    code: err.code,
                    message: err.message,
                }
            });
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

/// Some handlers report failure inside an otherwise successful result as
/// `{"err_code": N, "err_msg": "..."}`.
fn check_err_code(result: &Value) -> Result<(), Error> {
    let Some(code) = result.get("err_code").and_then(Value::as_i64) else {
        return Ok(());
    };
    if code == 0 {
        return Ok(());
    }
    let message = result
        .get("err_msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    Err(Error::NonZero { code, message })
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}
