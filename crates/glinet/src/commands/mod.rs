//! Command dispatch: bridges CLI args -> router commands -> output formatting.

pub mod clients;
pub mod config_cmd;
pub mod status;
pub mod system;
pub mod util;
pub mod vpn;
pub mod wan;
pub mod watch;
pub mod wifi;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use glinet_config::SessionState;
use glinet_core::Router;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    if let Command::Watch(args) = cmd {
        return watch::handle(args, global).await;
    }

    let conn = connect(global, false).await?;
    let result = match cmd {
        Command::Status => status::handle(&conn.router, global),
        Command::Clients(args) => clients::handle(&conn.router, args, global),
        Command::Wifi(args) => wifi::handle(&conn.router, args, global).await,
        Command::Wireguard(args) => vpn::handle_wireguard(&conn.router, args, global).await,
        Command::Tailscale(args) => vpn::handle_tailscale(&conn.router, args, global).await,
        Command::Wan(args) => wan::handle(&conn.router, &args, global),
        Command::Reboot => system::reboot(&conn.router, global).await,
        // Handled before a connection is opened
        Command::Watch(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    };
    let profile_name = conn.profile_name.clone();
    conn.close(true).await;
    result.map_err(|e| e.for_profile(&profile_name))
}

// ── Connection lifecycle ─────────────────────────────────────────────

/// A set-up router plus where its session state lives on disk.
pub struct Connection {
    pub router: Router,
    pub profile_name: String,
    state_path: PathBuf,
}

/// Resolve the profile, seed the router with the saved session state and
/// run setup. Without `poll` the background poll task is not started.
pub async fn connect(global: &GlobalOpts, poll: bool) -> Result<Connection, CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let mut profile = config::effective_profile(global, &cfg, &profile_name)?;

    let state_path = glinet_config::state_path(&profile_name);
    let state = glinet_config::load_state(&state_path).unwrap_or_else(|e| {
        warn!(path = %state_path.display(), error = %e, "ignoring unreadable session state");
        SessionState::default()
    });
    if profile.api_token.is_none() {
        profile.api_token.clone_from(&state.token);
    }

    let mut router_config =
        glinet_config::profile_to_router_config(&profile, &profile_name, &cfg.defaults)?;
    if !poll {
        router_config.poll_interval = Duration::ZERO;
    }

    let router = Router::from_config(router_config)?;
    router.restore_devices(state.known_devices());
    router
        .setup()
        .await
        .map_err(|e| CliError::from(e).for_profile(&profile_name))?;

    Ok(Connection {
        router,
        profile_name,
        state_path,
    })
}

impl Connection {
    /// Write the current token and tracked devices to the state file.
    pub fn save_state(&self) {
        let token = self.router.session().current_token();
        let state = SessionState::capture(token.as_ref(), &self.router.devices_snapshot());
        match glinet_config::save_state(&self.state_path, &state) {
            Ok(()) => debug!(path = %self.state_path.display(), "session state saved"),
            Err(e) => warn!(error = %e, "failed to save session state"),
        }
    }

    /// Optionally persist state, then stop the router's tasks.
    pub async fn close(self, save: bool) {
        if save {
            self.save_state();
        }
        self.router.shutdown().await;
    }
}
