//! Shared configuration for GL-iNet tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! persisted session state, and translation to
//! `glinet_core::RouterConfig`. The CLI adds flag-aware wrappers on top.

mod state;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use glinet_core::config::{
    DEFAULT_CONSIDER_HOME, DEFAULT_URL, DEFAULT_USERNAME, POLL_INTERVAL, clamp_consider_home,
};
use glinet_core::{RouterConfig, TlsVerification};

pub use state::{KnownDevice, SessionState, load_state, save_state, state_path};

const KEYRING_SERVICE: &str = "glinet";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named router profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the explicit one, else the configured
    /// default, else `default`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds an absent device is still reported home.
    #[serde(default = "default_consider_home")]
    pub consider_home: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            consider_home: default_consider_home(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_consider_home() -> u64 {
    DEFAULT_CONSIDER_HOME.as_secs()
}

/// A named router profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Router base URL (e.g., "http://192.168.8.1").
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Previously issued session token, tried before logging in.
    pub api_token: Option<String>,

    /// Stable identifier for device-info records.
    pub unique_id: Option<String>,

    /// Override the consider-home window (seconds, 0..=900).
    pub consider_home: Option<u64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// `true` skips certificate checks, `false` enforces them. Unset
    /// accepts the router's self-signed certificate.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            host: default_host(),
            username: default_username(),
            password: None,
            password_env: None,
            api_token: None,
            unique_id: None,
            consider_home: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_URL.into()
}
fn default_username() -> String {
    DEFAULT_USERNAME.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub(crate) fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "glinet-monitor", "glinet").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("glinet");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Environment keys use `__` as separator, e.g.
/// `GLINET_DEFAULTS__TIMEOUT=10` or `GLINET_PROFILES__HOME__HOST=...`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GLINET_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the password from the credential chain:
/// `password_env`, `GLINET_PASSWORD`, system keyring, plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_password_with(
        profile,
        |name| std::env::var(name).ok(),
        || keyring_password(profile_name),
    )
}

/// [`resolve_password`] with the environment and keyring lookups supplied
/// by the caller.
pub fn resolve_password_with(
    profile: &Profile,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl FnOnce() -> Option<String>,
) -> Option<SecretString> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Some(SecretString::from(pw));
    }

    // 2. Global env var
    if let Some(pw) = env("GLINET_PASSWORD") {
        return Some(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring() {
        return Some(SecretString::from(pw));
    }

    // 4. Plaintext in config
    profile.password.clone().map(SecretString::from)
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Build a `RouterConfig` from a profile with no CLI overrides.
///
/// Needs a password or a stored token; the token is only tried once, so
/// without a password an expired token ends the session.
pub fn profile_to_router_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<RouterConfig, ConfigError> {
    let password = resolve_password(profile, profile_name);
    build_router_config(profile, profile_name, defaults, password)
}

/// [`profile_to_router_config`] with the password already resolved.
pub fn build_router_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    password: Option<SecretString>,
) -> Result<RouterConfig, ConfigError> {
    let url = parse_host(&profile.host)?;

    let token = profile
        .api_token
        .as_ref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| SecretString::from(t.clone()));
    if password.is_none() && token.is_none() {
        return Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        });
    }

    let tls = match (profile.insecure, &profile.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca_path)) => TlsVerification::CustomCa(ca_path.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        (None, None) => TlsVerification::DangerAcceptInvalid, // routers ship self-signed certs
    };

    Ok(RouterConfig {
        url,
        username: profile.username.clone(),
        password,
        token,
        unique_id: profile.unique_id.clone(),
        consider_home: clamp_consider_home(
            profile.consider_home.unwrap_or(defaults.consider_home),
        ),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        poll_interval: POLL_INTERVAL,
    })
}

/// Parse a router address. A bare host or IP gets `http://`.
pub fn parse_host(host: &str) -> Result<url::Url, ConfigError> {
    let host = host.trim();
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    };
    let invalid = |reason: String| ConfigError::Validation {
        field: "host".into(),
        reason,
    };

    let url: url::Url = candidate
        .parse()
        .map_err(|e| invalid(format!("invalid URL {host:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid(format!("no host in {host:?}")));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile() -> Profile {
        Profile {
            password: Some("plain".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.consider_home, 180);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "cabin"

[defaults]
timeout = 10

[profiles.cabin]
host = "192.168.8.1"
password_env = "CABIN_PW"
consider_home = 60
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(None), "cabin");
        assert_eq!(cfg.active_profile_name(Some("other")), "other");
        assert_eq!(cfg.defaults.timeout, 10);
        let cabin = cfg.profile("cabin").unwrap();
        assert_eq!(cabin.username, "root");
        assert_eq!(cabin.consider_home, Some(60));
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile());

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profile("default").unwrap().password.as_deref(), Some("plain"));
    }

    #[test]
    fn password_env_wins_over_everything() {
        let mut p = profile();
        p.password_env = Some("CABIN_PW".into());
        let env = |name: &str| match name {
            "CABIN_PW" => Some("from-profile-env".to_owned()),
            "GLINET_PASSWORD" => Some("from-global-env".to_owned()),
            _ => None,
        };
        let pw = resolve_password_with(&p, env, || Some("from-keyring".into())).unwrap();
        assert_eq!(pw.expose_secret(), "from-profile-env");
    }

    #[test]
    fn keyring_wins_over_plaintext() {
        let pw = resolve_password_with(&profile(), |_| None, || Some("from-keyring".into()))
            .unwrap();
        assert_eq!(pw.expose_secret(), "from-keyring");

        let pw = resolve_password_with(&profile(), |_| None, || None).unwrap();
        assert_eq!(pw.expose_secret(), "plain");
    }

    #[test]
    fn router_config_from_profile() {
        let mut p = profile();
        p.host = "https://router.lan".into();
        p.consider_home = Some(5_000);
        p.timeout = Some(5);

        let cfg = build_router_config(
            &p,
            "default",
            &Defaults::default(),
            Some(SecretString::from("pw".to_owned())),
        )
        .unwrap();

        assert_eq!(cfg.url.as_str(), "https://router.lan/");
        assert_eq!(cfg.username, "root");
        assert_eq!(cfg.consider_home, Duration::from_secs(900));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.poll_interval, POLL_INTERVAL);
    }

    #[test]
    fn token_alone_is_enough() {
        let p = Profile {
            api_token: Some("sid-abc".into()),
            ..Profile::default()
        };
        let cfg = build_router_config(&p, "default", &Defaults::default(), None).unwrap();
        assert!(cfg.password.is_none());
        assert_eq!(cfg.token.unwrap().expose_secret(), "sid-abc");
    }

    #[test]
    fn no_credentials_is_an_error() {
        let err =
            build_router_config(&Profile::default(), "cabin", &Defaults::default(), None)
                .unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "cabin"));
    }

    #[test]
    fn explicit_secure_uses_system_roots() {
        let p = Profile {
            insecure: Some(false),
            ..profile()
        };
        let cfg = build_router_config(
            &p,
            "default",
            &Defaults::default(),
            Some(SecretString::from("pw".to_owned())),
        )
        .unwrap();
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(parse_host("192.168.8.1").unwrap().as_str(), "http://192.168.8.1/");
        assert!(parse_host("ftp://router").is_err());
        assert!(parse_host("http://").is_err());
    }
}
