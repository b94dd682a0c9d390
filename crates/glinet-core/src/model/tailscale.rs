// ── Tailscale ──

use serde::{Deserialize, Serialize};

/// Tailscale state as last reported by the router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailscaleStatus {
    pub configured: bool,
    pub lan_enabled: Option<bool>,
    /// `None` when Tailscale is not configured.
    pub connected: Option<bool>,
}

impl TailscaleStatus {
    pub fn not_configured() -> Self {
        Self::default()
    }
}
