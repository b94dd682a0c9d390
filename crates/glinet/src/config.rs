//! CLI configuration: thin wrapper around `glinet_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--host, --username, --timeout, --insecure).

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use glinet_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Pick the profile to connect with and apply flag overrides.
///
/// An explicitly requested profile must exist. Without one, a missing
/// default profile falls back to factory settings so `--host` plus
/// `GLINET_PASSWORD` work without a config file.
pub fn effective_profile(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    let mut profile = match config.profiles.get(profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username.clone_from(username);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    Ok(profile)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["glinet"];
        argv.extend_from_slice(args);
        argv.push("status");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut config = Config::default();
        config.profiles.insert(name.into(), profile);
        config
    }

    #[test]
    fn flags_override_profile() {
        let config = config_with(
            "default",
            Profile {
                host: "10.0.0.1".into(),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        let profile = effective_profile(
            &global(&["--host", "192.168.9.1", "--timeout", "12", "-k", "-u", "admin"]),
            &config,
            "default",
        )
        .unwrap();
        assert_eq!(profile.host, "192.168.9.1");
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.timeout, Some(12));
        assert_eq!(profile.insecure, Some(true));
    }

    #[test]
    fn missing_default_profile_uses_factory_settings() {
        let profile = effective_profile(&global(&[]), &Config::default(), "default").unwrap();
        assert_eq!(profile.host, "http://192.168.8.1");
        assert_eq!(profile.username, "root");
    }

    #[test]
    fn missing_explicit_profile_is_an_error() {
        let config = config_with("home", Profile::default());
        let err = effective_profile(&global(&["-p", "office"]), &config, "office").unwrap_err();
        assert!(matches!(
            err,
            CliError::ProfileNotFound { ref available, .. } if available == "home"
        ));
    }
}
