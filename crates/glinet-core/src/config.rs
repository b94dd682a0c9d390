// ── Runtime connection configuration ──
//
// These types describe *how* to reach a router. They carry credential
// data and polling tuning, but never touch disk. The CLI constructs a
// `RouterConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Router address when none is configured.
pub const DEFAULT_URL: &str = "http://192.168.8.1";
/// Username when none is configured.
pub const DEFAULT_USERNAME: &str = "root";
/// Factory password printed on the router label of older models.
pub const DEFAULT_PASSWORD: &str = "goodlife";

/// Fixed poll cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

pub const DEFAULT_CONSIDER_HOME: Duration = Duration::from_secs(180);
pub const MAX_CONSIDER_HOME: Duration = Duration::from_secs(900);

/// Clamp a user-supplied consider-home window to 0..=900 seconds.
pub fn clamp_consider_home(secs: u64) -> Duration {
    Duration::from_secs(secs).min(MAX_CONSIDER_HOME)
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Default, since routers ship self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one router.
///
/// Built by the CLI, passed to `Router`; core never reads config files.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router root URL (e.g. `http://192.168.8.1`).
    pub url: Url,
    pub username: String,
    /// Needed for login and every token renewal.
    pub password: Option<SecretString>,
    /// Previously issued session token, tried before logging in.
    pub token: Option<SecretString>,
    /// Stable identifier for device-info records. Falls back to the
    /// router's factory MAC.
    pub unique_id: Option<String>,
    /// Grace period before an absent device is reported as away.
    pub consider_home: Duration,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Background poll cadence. `Duration::ZERO` disables the poll task.
    pub poll_interval: Duration,
}

impl RouterConfig {
    /// Config for `url` with every other field at its default.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            username: DEFAULT_USERNAME.into(),
            password: None,
            token: None,
            unique_id: None,
            consider_home: DEFAULT_CONSIDER_HOME,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            poll_interval: POLL_INTERVAL,
        }
    }
}
