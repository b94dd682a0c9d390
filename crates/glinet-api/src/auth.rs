// Challenge/response login
//
// The router never receives the password. `challenge` returns the crypt
// algorithm, salt and a one-time nonce; the client computes
// `md5(username:crypt(password, "$alg$salt$"):nonce)` and trades it for a
// session id with `login`.

use md5::{Digest, Md5};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{GlinetClient, decode};
use crate::error::Error;

/// Parameters returned by the `challenge` method.
#[derive(Debug, Clone, Deserialize)]
pub struct Challenge {
    /// crypt(3) algorithm id: 1 (MD5), 5 (SHA-256) or 6 (SHA-512).
    pub alg: u8,
    pub salt: String,
    pub nonce: String,
}

#[derive(Deserialize)]
struct LoginResult {
    sid: String,
}

impl GlinetClient {
    /// Authenticate with username/password.
    ///
    /// On success the session id is stored on the client and attached to
    /// every later `call`; it is also returned so the caller can persist it.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<SecretString, Error> {
        debug!(username, "requesting login challenge");
        let challenge: Challenge = decode(
            self.request("challenge", json!({ "username": username }))
                .await
                .map_err(rejection_to_auth)?,
        )?;

        let hash = login_hash(username, password.expose_secret(), &challenge)?;

        let result: LoginResult = decode(
            self.request("login", json!({ "username": username, "hash": hash }))
                .await
                .map_err(rejection_to_auth)?,
        )?;

        let sid = SecretString::from(result.sid);
        self.set_sid(Some(sid.clone()));
        debug!("login successful");
        Ok(sid)
    }
}

/// During login any refusal by the router means the credentials are bad.
fn rejection_to_auth(err: Error) -> Error {
    match err {
        Error::TokenRejected { message } | Error::NonZero { message, .. } => {
            Error::Authentication { message }
        }
        other => other,
    }
}

/// Compute the login hash for a challenge.
pub fn login_hash(username: &str, password: &str, challenge: &Challenge) -> Result<String, Error> {
    let setting = format!("${}${}$", challenge.alg, challenge.salt);
    let cipher = pwhash::unix::crypt(password, &setting).map_err(|e| Error::Authentication {
        message: format!("unsupported login challenge (alg {}): {e}", challenge.alg),
    })?;
    Ok(md5_hex(&format!("{username}:{cipher}:{}", challenge.nonce)))
}

fn md5_hex(input: &str) -> String {
    Md5::digest(input.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
