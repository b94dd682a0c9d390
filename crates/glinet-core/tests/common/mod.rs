// In-memory router standing in for the JSON-RPC client.
//
// Accepts exactly one session token at a time, like the firmware does, and
// lets tests inject per-operation faults, revoke the token or change the
// password between polls.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use glinet_api::models::{
    ClientEntry, CpuStats, MultiWanStatus, RouterInfo, SystemStats, SystemStatusResponse,
    TailscaleConfig, TailscaleConnection, WanFamilyStatus, WanInterfaceStatus, WifiIface,
    WireGuardPeer, WireGuardState,
};
use glinet_api::{Error, RouterApi};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use glinet_core::RouterConfig;

pub const PASSWORD: &str = "goodlife";

/// Failure a fake operation can be told to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Timeout,
    TokenRejected,
    NonZero,
    BadGateway,
}

impl Fault {
    fn to_error(self) -> Error {
        match self {
            Self::Timeout => Error::Timeout { timeout_secs: 30 },
            Self::TokenRejected => Error::TokenRejected {
                message: "Access denied".into(),
            },
            Self::NonZero => Error::NonZero {
                code: -1,
                message: "busy".into(),
            },
            Self::BadGateway => Error::Http { status: 502 },
        }
    }
}

/// Everything the fake router reports and records.
pub struct FakeState {
    pub password: String,
    /// Token the "router" currently accepts.
    pub issued: Option<String>,
    /// Token the "client" attaches to calls.
    pub attached: Option<String>,
    pub faults: HashMap<&'static str, Fault>,
    pub calls: Vec<&'static str>,

    pub info: RouterInfo,
    pub uptime: u64,
    pub clients: Vec<ClientEntry>,
    pub wifi: Vec<WifiIface>,
    pub peers: Vec<WireGuardPeer>,
    pub wireguard: WireGuardState,
    pub tailscale_configured: bool,
    pub tailscale_config: TailscaleConfig,
    pub tailscale: TailscaleConnection,
    pub multiwan: MultiWanStatus,

    pub wifi_switched: Vec<(String, bool)>,
    pub tunnels_started: Vec<u32>,
    pub tunnels_stopped: Vec<u32>,
    pub reboots: usize,
}

pub struct FakeRouter {
    pub state: Mutex<FakeState>,
    logins: AtomicUsize,
    login_delay: Duration,
}

impl FakeRouter {
    pub fn new() -> Self {
        Self::with_login_delay(Duration::ZERO)
    }

    pub fn with_login_delay(login_delay: Duration) -> Self {
        Self {
            state: Mutex::new(FakeState {
                password: PASSWORD.into(),
                issued: None,
                attached: None,
                faults: HashMap::new(),
                calls: Vec::new(),
                info: RouterInfo {
                    mac: "94:83:C4:00:00:FF".into(),
                    model: "mt3000".into(),
                    firmware_version: Some("4.5.0".into()),
                },
                uptime: 3_600,
                clients: vec![
                    client("aa:bb:cc:00:00:01", Some("laptop"), None, Some("192.168.8.101")),
                    client("aa:bb:cc:00:00:02", None, Some("phone"), Some("192.168.8.102")),
                    client("aa:bb:cc:00:00:03", Some("*"), None, Some("192.168.8.103")),
                ],
                wifi: vec![
                    wifi("wifi2g", "home", true),
                    wifi("wifi5g", "home-5g", false),
                ],
                peers: vec![peer(1, "office"), peer(2, "travel")],
                wireguard: WireGuardState {
                    status: 1,
                    group_id: Some(1),
                    peer_id: Some(2),
                    tunnel_id: Some(7),
                },
                tailscale_configured: true,
                tailscale_config: TailscaleConfig {
                    enabled: true,
                    lan_enabled: Some(true),
                    wan_enabled: Some(false),
                },
                tailscale: TailscaleConnection::Connected,
                multiwan: MultiWanStatus {
                    mode: 0,
                    interfaces: vec![WanInterfaceStatus {
                        interface: "wan".into(),
                        enabled: true,
                        ipv4: Some(WanFamilyStatus { online: true }),
                        metric: Some(10),
                        ..WanInterfaceStatus::default()
                    }],
                },
                wifi_switched: Vec::new(),
                tunnels_started: Vec::new(),
                tunnels_stopped: Vec::new(),
                reboots: 0,
            }),
            logins: AtomicUsize::new(0),
            login_delay,
        }
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn read<T>(&self, f: impl FnOnce(&FakeState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    pub fn fail(&self, op: &'static str, fault: Fault) {
        self.update(|s| {
            s.faults.insert(op, fault);
        });
    }

    pub fn heal(&self, op: &'static str) {
        self.update(|s| {
            s.faults.remove(op);
        });
    }

    /// Invalidate the current session server-side.
    pub fn revoke_token(&self) {
        self.update(|s| s.issued = None);
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.read(|s| s.calls.iter().filter(|c| **c == op).count())
    }

    /// Record the call, then apply injected faults and token checks.
    fn check(&self, op: &'static str) -> Result<(), Error> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(op);
        if let Some(fault) = s.faults.get(op) {
            return Err(fault.to_error());
        }
        match (&s.attached, &s.issued) {
            (None, _) => Err(Error::NotLoggedIn),
            (Some(attached), Some(issued)) if attached == issued => Ok(()),
            _ => Err(Error::TokenRejected {
                message: "Access denied".into(),
            }),
        }
    }
}

#[async_trait]
impl RouterApi for FakeRouter {
    async fn login(&self, username: &str, password: &SecretString) -> Result<SecretString, Error> {
        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }
        let mut s = self.state.lock().unwrap();
        s.calls.push("login");
        if let Some(fault) = s.faults.get("login") {
            return Err(fault.to_error());
        }
        if username != "root" || password.expose_secret() != s.password {
            return Err(Error::Authentication {
                message: "Access denied".into(),
            });
        }
        let sid = format!("sid-{n}");
        s.issued = Some(sid.clone());
        s.attached = Some(sid.clone());
        Ok(SecretString::from(sid))
    }

    fn set_token(&self, token: Option<SecretString>) {
        self.update(|s| s.attached = token.map(|t| t.expose_secret().to_owned()));
    }

    async fn router_info(&self) -> Result<RouterInfo, Error> {
        self.check("router_info")?;
        Ok(self.read(|s| s.info.clone()))
    }

    async fn system_status(&self) -> Result<SystemStatusResponse, Error> {
        self.check("system_status")?;
        Ok(self.read(|s| SystemStatusResponse {
            system: SystemStats {
                uptime: Some(s.uptime),
                load_average: vec![0.25, 0.5, 0.75],
                cpu: Some(CpuStats {
                    temperature: Some(48.0),
                }),
            },
        }))
    }

    async fn connected_clients(&self) -> Result<Vec<ClientEntry>, Error> {
        self.check("connected_clients")?;
        Ok(self.read(|s| s.clients.clone()))
    }

    async fn wifi_interfaces(&self) -> Result<Vec<WifiIface>, Error> {
        self.check("wifi_interfaces")?;
        Ok(self.read(|s| s.wifi.clone()))
    }

    async fn set_wifi_enabled(&self, iface_name: &str, enabled: bool) -> Result<(), Error> {
        self.check("set_wifi_enabled")?;
        self.update(|s| {
            s.wifi_switched.push((iface_name.to_owned(), enabled));
            for iface in s.wifi.iter_mut().filter(|i| i.name == iface_name) {
                iface.enabled = enabled;
            }
        });
        Ok(())
    }

    async fn wireguard_clients(&self) -> Result<Vec<WireGuardPeer>, Error> {
        self.check("wireguard_clients")?;
        Ok(self.read(|s| s.peers.clone()))
    }

    async fn wireguard_state(&self) -> Result<WireGuardState, Error> {
        self.check("wireguard_state")?;
        Ok(self.read(|s| s.wireguard.clone()))
    }

    async fn wireguard_start(&self, tunnel_id: u32) -> Result<(), Error> {
        self.check("wireguard_start")?;
        self.update(|s| s.tunnels_started.push(tunnel_id));
        Ok(())
    }

    async fn wireguard_stop(&self, tunnel_id: u32) -> Result<(), Error> {
        self.check("wireguard_stop")?;
        self.update(|s| s.tunnels_stopped.push(tunnel_id));
        Ok(())
    }

    async fn tailscale_config(&self) -> Result<Option<TailscaleConfig>, Error> {
        self.check("tailscale_config")?;
        Ok(self.read(|s| s.tailscale_configured.then(|| s.tailscale_config.clone())))
    }

    async fn tailscale_state(&self) -> Result<TailscaleConnection, Error> {
        self.check("tailscale_state")?;
        Ok(self.read(|s| s.tailscale))
    }

    async fn tailscale_start(&self) -> Result<(), Error> {
        self.check("tailscale_start")?;
        self.update(|s| s.tailscale = TailscaleConnection::Connected);
        Ok(())
    }

    async fn tailscale_stop(&self) -> Result<(), Error> {
        self.check("tailscale_stop")?;
        self.update(|s| s.tailscale = TailscaleConnection::NotRunning);
        Ok(())
    }

    async fn multiwan_state(&self) -> Result<MultiWanStatus, Error> {
        self.check("multiwan_state")?;
        Ok(self.read(|s| s.multiwan.clone()))
    }

    async fn reboot(&self) -> Result<(), Error> {
        self.check("reboot")?;
        self.update(|s| s.reboots += 1);
        Ok(())
    }
}

// ── Builders ────────────────────────────────────────────────────────

pub fn client(mac: &str, name: Option<&str>, alias: Option<&str>, ip: Option<&str>) -> ClientEntry {
    ClientEntry {
        mac: mac.into(),
        name: name.map(Into::into),
        alias: alias.map(Into::into),
        ip: ip.map(Into::into),
        online: true,
        iface_type: Some(0),
    }
}

pub fn wifi(name: &str, ssid: &str, enabled: bool) -> WifiIface {
    WifiIface {
        name: name.into(),
        enabled,
        ssid: ssid.into(),
        ..WifiIface::default()
    }
}

pub fn peer(peer_id: u32, name: &str) -> WireGuardPeer {
    WireGuardPeer {
        name: name.into(),
        group_id: 1,
        peer_id,
    }
}

/// Config with a password and no background polling.
pub fn config() -> RouterConfig {
    let mut config = RouterConfig::new(Url::parse("http://192.168.8.1").unwrap());
    config.password = Some(SecretString::from(PASSWORD.to_owned()));
    config.poll_interval = Duration::ZERO;
    config
}
