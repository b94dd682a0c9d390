// ── Persisted session state ──
//
// Per-profile TOML file next to the config holding the latest session
// token and the devices seen so far, so a restart neither logs in again
// nor forgets who was home.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use glinet_core::{ConnectedDevice, MacAddress};

use crate::{ConfigError, config_dir};

/// A device remembered across runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KnownDevice {
    pub mac: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionState {
    pub token: Option<String>,
    #[serde(default)]
    pub devices: Vec<KnownDevice>,
}

impl SessionState {
    /// Capture the current token and tracked devices.
    pub fn capture(token: Option<&SecretString>, devices: &[Arc<ConnectedDevice>]) -> Self {
        Self {
            token: token.map(|t| t.expose_secret().to_owned()),
            devices: devices
                .iter()
                .map(|d| KnownDevice {
                    mac: d.mac.to_string(),
                    name: Some(d.name.clone()),
                })
                .collect(),
        }
    }

    pub fn token(&self) -> Option<SecretString> {
        self.token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.clone()))
    }

    /// Devices in the form `Router::restore_devices` takes.
    pub fn known_devices(&self) -> Vec<(MacAddress, Option<String>)> {
        self.devices
            .iter()
            .map(|d| (MacAddress::new(&d.mac), d.name.clone()))
            .collect()
    }
}

/// State file for `profile_name`.
pub fn state_path(profile_name: &str) -> PathBuf {
    config_dir().join("state").join(format!("{profile_name}.toml"))
}

/// Read a state file. A missing file is an empty state.
pub fn load_state(path: &Path) -> Result<SessionState, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SessionState::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a state file, readable only by the owner on Unix.
pub fn save_state(path: &Path, state: &SessionState) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(state)?)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_state_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(&dir.path().join("default.toml")).unwrap();
        assert_eq!(state, SessionState::default());
        assert!(state.token().is_none());
    }

    #[test]
    fn captured_state_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("default.toml");
        let seen = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let device = ConnectedDevice::restored(
            MacAddress::new("AA:BB:CC:00:00:01"),
            Some("laptop".into()),
            seen,
        );

        let state = SessionState::capture(
            Some(&SecretString::from("sid-9".to_owned())),
            &[Arc::new(device)],
        );
        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap();

        assert_eq!(loaded.token().unwrap().expose_secret(), "sid-9");
        assert_eq!(
            loaded.known_devices(),
            [(MacAddress::new("aa:bb:cc:00:00:01"), Some("laptop".to_owned()))]
        );
    }

    #[test]
    fn corrupt_state_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        std::fs::write(&path, "token = [").unwrap();
        assert!(matches!(load_state(&path), Err(ConfigError::Parse { .. })));
    }
}
