// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The router
// routes each variant to the matching remote call and refreshes the part
// of the cache the command affects.

use serde::Serialize;

use crate::error::CoreError;

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All possible write operations against a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reboot the router immediately.
    Reboot,

    // ── WiFi ─────────────────────────────────────────────────────────
    SetWifiEnabled {
        iface: String,
        enabled: bool,
    },

    // ── VPN ──────────────────────────────────────────────────────────
    /// Bring up the tunnel of a configured WireGuard peer.
    StartWireGuard {
        peer_id: u32,
    },
    StopWireGuard {
        peer_id: u32,
    },
    StartTailscale,
    StopTailscale,
}

impl Command {
    /// Operation name used in logs and errors.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Reboot => "reboot",
            Self::SetWifiEnabled { .. } => "set_wifi_enabled",
            Self::StartWireGuard { .. } => "wireguard_start",
            Self::StopWireGuard { .. } => "wireguard_stop",
            Self::StartTailscale => "tailscale_start",
            Self::StopTailscale => "tailscale_stop",
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum CommandResult {
    Ok,
    /// The router accepted the reboot and will drop off the network.
    Rebooting,
}
