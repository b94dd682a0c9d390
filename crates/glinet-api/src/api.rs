// The remote-call seam.
//
// `glinet-core` never talks to `GlinetClient` directly; it holds an
// `Arc<dyn RouterApi>` so tests and alternative transports can stand in.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::client::GlinetClient;
use crate::error::Error;
use crate::models::{
    ClientEntry, MultiWanStatus, RouterInfo, SystemStatusResponse, TailscaleConfig,
    TailscaleConnection, WifiIface, WireGuardPeer, WireGuardState,
};

/// Every operation the monitor performs against a router.
#[async_trait]
pub trait RouterApi: Send + Sync {
    /// Log in and return the new session token. The implementation keeps
    /// the token and attaches it to later calls.
    async fn login(&self, username: &str, password: &SecretString) -> Result<SecretString, Error>;

    /// Attach a previously issued token without logging in.
    fn set_token(&self, token: Option<SecretString>);

    async fn router_info(&self) -> Result<RouterInfo, Error>;
    async fn system_status(&self) -> Result<SystemStatusResponse, Error>;
    async fn connected_clients(&self) -> Result<Vec<ClientEntry>, Error>;

    async fn wifi_interfaces(&self) -> Result<Vec<WifiIface>, Error>;
    async fn set_wifi_enabled(&self, iface_name: &str, enabled: bool) -> Result<(), Error>;

    async fn wireguard_clients(&self) -> Result<Vec<WireGuardPeer>, Error>;
    async fn wireguard_state(&self) -> Result<WireGuardState, Error>;
    async fn wireguard_start(&self, tunnel_id: u32) -> Result<(), Error>;
    async fn wireguard_stop(&self, tunnel_id: u32) -> Result<(), Error>;

    /// `None` when Tailscale is not available on the router.
    async fn tailscale_config(&self) -> Result<Option<TailscaleConfig>, Error>;
    async fn tailscale_state(&self) -> Result<TailscaleConnection, Error>;
    async fn tailscale_start(&self) -> Result<(), Error>;
    async fn tailscale_stop(&self) -> Result<(), Error>;

    async fn multiwan_state(&self) -> Result<MultiWanStatus, Error>;
    async fn reboot(&self) -> Result<(), Error>;
}

#[async_trait]
impl RouterApi for GlinetClient {
    async fn login(&self, username: &str, password: &SecretString) -> Result<SecretString, Error> {
        GlinetClient::login(self, username, password).await
    }

    fn set_token(&self, token: Option<SecretString>) {
        self.set_sid(token);
    }

    async fn router_info(&self) -> Result<RouterInfo, Error> {
        GlinetClient::router_info(self).await
    }

    async fn system_status(&self) -> Result<SystemStatusResponse, Error> {
        GlinetClient::system_status(self).await
    }

    async fn connected_clients(&self) -> Result<Vec<ClientEntry>, Error> {
        GlinetClient::connected_clients(self).await
    }

    async fn wifi_interfaces(&self) -> Result<Vec<WifiIface>, Error> {
        GlinetClient::wifi_interfaces(self).await
    }

    async fn set_wifi_enabled(&self, iface_name: &str, enabled: bool) -> Result<(), Error> {
        GlinetClient::set_wifi_enabled(self, iface_name, enabled).await
    }

    async fn wireguard_clients(&self) -> Result<Vec<WireGuardPeer>, Error> {
        GlinetClient::wireguard_clients(self).await
    }

    async fn wireguard_state(&self) -> Result<WireGuardState, Error> {
        GlinetClient::wireguard_state(self).await
    }

    async fn wireguard_start(&self, tunnel_id: u32) -> Result<(), Error> {
        self.set_wireguard_tunnel(tunnel_id, true).await
    }

    async fn wireguard_stop(&self, tunnel_id: u32) -> Result<(), Error> {
        self.set_wireguard_tunnel(tunnel_id, false).await
    }

    async fn tailscale_config(&self) -> Result<Option<TailscaleConfig>, Error> {
        GlinetClient::tailscale_config(self).await
    }

    async fn tailscale_state(&self) -> Result<TailscaleConnection, Error> {
        GlinetClient::tailscale_state(self).await
    }

    async fn tailscale_start(&self) -> Result<(), Error> {
        self.set_tailscale_enabled(true).await
    }

    async fn tailscale_stop(&self) -> Result<(), Error> {
        self.set_tailscale_enabled(false).await
    }

    async fn multiwan_state(&self) -> Result<MultiWanStatus, Error> {
        GlinetClient::multiwan_state(self).await
    }

    async fn reboot(&self) -> Result<(), Error> {
        GlinetClient::reboot(self).await
    }
}
