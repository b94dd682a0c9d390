// ── WireGuard client peers ──

use serde::{Deserialize, Serialize};

/// A configured WireGuard client peer and whether it is the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGuardClient {
    pub name: String,
    pub group_id: u32,
    pub peer_id: u32,
    /// Only known once the router has reported this peer as active.
    pub tunnel_id: Option<u32>,
    pub connected: bool,
}

impl WireGuardClient {
    /// A peer from the configuration list, before any state is applied.
    pub fn configured(name: String, group_id: u32, peer_id: u32) -> Self {
        Self {
            name,
            group_id,
            peer_id,
            tunnel_id: None,
            connected: false,
        }
    }

    /// Store key for this peer.
    pub fn key(&self) -> String {
        self.peer_id.to_string()
    }
}

/// Which peer the router reports as active, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireGuardActivity {
    pub connected: bool,
    pub peer_id: Option<u32>,
    pub tunnel_id: Option<u32>,
}
