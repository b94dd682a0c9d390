// Wire types for the router's JSON-RPC results.
//
// Field sets vary between firmware releases, so almost everything is
// optional or defaulted. `glinet-core` converts these into its own domain
// records; nothing outside the two crates should depend on this shape.

use serde::{Deserialize, Serialize};

// ── System ──────────────────────────────────────────────────────────

/// `system.get_info`: static identity of the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterInfo {
    pub mac: String,
    pub model: String,
    #[serde(default)]
    pub firmware_version: Option<String>,
}

/// `system.get_status`: the `system` member is the only part we read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemStatusResponse {
    #[serde(default)]
    pub system: SystemStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(default)]
    pub uptime: Option<u64>,
    #[serde(default)]
    pub load_average: Vec<f64>,
    #[serde(default)]
    pub cpu: Option<CpuStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub temperature: Option<f64>,
}

// ── Clients ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ClientListResponse {
    #[serde(default)]
    pub clients: Vec<ClientEntry>,
}

/// One entry of `clients.get_list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientEntry {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub online: bool,
    /// Index into the router's interface-type table.
    #[serde(rename = "type", default)]
    pub iface_type: Option<i64>,
}

// ── WiFi ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WifiConfigResponse {
    #[serde(default)]
    pub res: Vec<WifiDevice>,
}

/// A radio with its configured interfaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WifiDevice {
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub ifaces: Vec<WifiIface>,
}

/// One WiFi interface. `band` is copied down from its radio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifiIface {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub guest: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub encryption: Option<String>,
    #[serde(default)]
    pub band: Option<String>,
}

// ── WireGuard ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireGuardConfigList {
    #[serde(default)]
    pub config_list: Vec<WireGuardGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireGuardGroup {
    pub group_id: u32,
    #[serde(default)]
    pub peers: Vec<WireGuardPeerEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireGuardPeerEntry {
    pub peer_id: u32,
    #[serde(default)]
    pub name: String,
}

/// A configured WireGuard client peer, flattened out of its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGuardPeer {
    pub name: String,
    pub group_id: u32,
    pub peer_id: u32,
}

/// `wg-client.get_status`: which single peer (if any) is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGuardState {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub group_id: Option<u32>,
    #[serde(default)]
    pub peer_id: Option<u32>,
    #[serde(default)]
    pub tunnel_id: Option<u32>,
}

impl WireGuardState {
    /// The router reports an established tunnel as status `1`.
    pub fn is_connected(&self) -> bool {
        self.status == 1
    }
}

// ── Tailscale ───────────────────────────────────────────────────────

/// `tailscale.get_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailscaleConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub lan_enabled: Option<bool>,
    #[serde(default)]
    pub wan_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TailscaleStatusResponse {
    #[serde(default)]
    pub status: i64,
}

/// Tailscale daemon connection state as reported by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TailscaleConnection {
    NotRunning,
    NeedsLogin,
    NeedsAuthorization,
    Connected,
    Connecting,
    Unknown(i64),
}

impl From<i64> for TailscaleConnection {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::NotRunning,
            1 => Self::NeedsLogin,
            2 => Self::NeedsAuthorization,
            3 => Self::Connected,
            4 => Self::Connecting,
            other => Self::Unknown(other),
        }
    }
}

// ── Multi-WAN ───────────────────────────────────────────────────────

/// `kmwan.get_status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiWanStatus {
    /// 0 = failover, 1 = load balancing.
    #[serde(default)]
    pub mode: i64,
    #[serde(default)]
    pub interfaces: Vec<WanInterfaceStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WanInterfaceStatus {
    pub interface: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ipv4: Option<WanFamilyStatus>,
    #[serde(default)]
    pub ipv6: Option<WanFamilyStatus>,
    #[serde(default)]
    pub metric: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub modem: Option<ModemStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanFamilyStatus {
    #[serde(default)]
    pub online: bool,
}

/// Cellular modem details attached to a `modem_*` interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModemStatus {
    #[serde(default)]
    pub signal: Option<ModemSignal>,
    #[serde(default)]
    pub sim: Option<SimStatus>,
    #[serde(default)]
    pub cells: Vec<CellEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModemSignal {
    #[serde(default)]
    pub strength: Option<i64>,
    #[serde(default)]
    pub rssi: Option<f64>,
    #[serde(default)]
    pub rsrp: Option<f64>,
    #[serde(default)]
    pub rsrq: Option<f64>,
    #[serde(default)]
    pub sinr: Option<f64>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStatus {
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub iccid: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub mcc: Option<String>,
    #[serde(default)]
    pub mnc: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub slot: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellEntry {
    /// `servingcell` for the cell the modem is attached to.
    #[serde(rename = "type", default)]
    pub cell_type: Option<String>,
    /// Radio access technology, e.g. `LTE` or `NR5G-NSA`.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub rsrp: Option<f64>,
    #[serde(default)]
    pub rsrq: Option<f64>,
    #[serde(default)]
    pub sinr: Option<f64>,
    #[serde(default)]
    pub rssi: Option<f64>,
    #[serde(default)]
    pub ul_bandwidth: Option<String>,
    #[serde(default)]
    pub dl_bandwidth: Option<String>,
    #[serde(default)]
    pub channel: Option<u32>,
}
