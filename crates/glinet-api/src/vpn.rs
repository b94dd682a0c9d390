// VPN endpoints: WireGuard client and Tailscale.

use serde::de::IgnoredAny;
use serde_json::json;
use tracing::debug;

use crate::client::GlinetClient;
use crate::error::Error;
use crate::models::{
    TailscaleConfig, TailscaleConnection, TailscaleStatusResponse, WireGuardConfigList,
    WireGuardPeer, WireGuardState,
};

/// JSON-RPC "method not found": firmware without the Tailscale package.
const METHOD_NOT_FOUND: i64 = -32601;

impl GlinetClient {
    // ── WireGuard ────────────────────────────────────────────────────

    /// All configured WireGuard client peers, across groups.
    ///
    /// `wg-client.get_all_config_list`
    pub async fn wireguard_clients(&self) -> Result<Vec<WireGuardPeer>, Error> {
        let resp: WireGuardConfigList = self
            .call("wg-client", "get_all_config_list", json!({}))
            .await?;
        Ok(resp
            .config_list
            .into_iter()
            .flat_map(|group| {
                let group_id = group.group_id;
                group.peers.into_iter().map(move |peer| WireGuardPeer {
                    name: peer.name,
                    group_id,
                    peer_id: peer.peer_id,
                })
            })
            .collect())
    }

    /// The currently active peer, if any.
    ///
    /// `wg-client.get_status`
    pub async fn wireguard_state(&self) -> Result<WireGuardState, Error> {
        self.call("wg-client", "get_status", json!({})).await
    }

    /// Bring a WireGuard tunnel up or down.
    ///
    /// `vpn-client.set_tunnel` with `{"tunnel_id": ..., "enabled": ...}`
    pub async fn set_wireguard_tunnel(&self, tunnel_id: u32, enabled: bool) -> Result<(), Error> {
        debug!(tunnel_id, enabled, "setting wireguard tunnel state");
        let _: IgnoredAny = self
            .call(
                "vpn-client",
                "set_tunnel",
                json!({ "tunnel_id": tunnel_id, "enabled": enabled }),
            )
            .await?;
        Ok(())
    }

    // ── Tailscale ────────────────────────────────────────────────────

    /// `tailscale.get_config`
    ///
    /// Returns `None` when the firmware has no Tailscale package.
    pub async fn tailscale_config(&self) -> Result<Option<TailscaleConfig>, Error> {
        match self.call("tailscale", "get_config", json!({})).await {
            Ok(config) => Ok(Some(config)),
            Err(Error::NonZero { code, .. }) if code == METHOD_NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `tailscale.get_status`
    pub async fn tailscale_state(&self) -> Result<TailscaleConnection, Error> {
        let resp: TailscaleStatusResponse = self.call("tailscale", "get_status", json!({})).await?;
        Ok(TailscaleConnection::from(resp.status))
    }

    /// Start or stop the Tailscale service.
    ///
    /// `tailscale.set_config` with `{"enabled": ...}`
    pub async fn set_tailscale_enabled(&self, enabled: bool) -> Result<(), Error> {
        debug!(enabled, "setting tailscale state");
        let _: IgnoredAny = self
            .call("tailscale", "set_config", json!({ "enabled": enabled }))
            .await?;
        Ok(())
    }
}
