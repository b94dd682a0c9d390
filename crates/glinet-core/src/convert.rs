// ── Wire type → domain type conversion ──
//
// The only place that knows both `glinet_api::models` and `crate::model`.

use glinet_api::models as wire;

use crate::model::{
    CellInfo, ClientReport, InterfaceType, MacAddress, ModemInfo, ModemSignal, MultiWanMode,
    MultiWanState, RouterIdentity, SimInfo, SystemStatus, WanInterface, WifiInterface,
    WireGuardActivity, WireGuardClient,
};

impl From<wire::ClientEntry> for ClientReport {
    fn from(entry: wire::ClientEntry) -> Self {
        Self {
            mac: MacAddress::new(&entry.mac),
            ip: entry.ip.as_deref().and_then(|ip| ip.trim().parse().ok()),
            name: entry.name,
            alias: entry.alias,
            online: entry.online,
            interface: InterfaceType::from_index(entry.iface_type),
        }
    }
}

impl From<wire::RouterInfo> for RouterIdentity {
    fn from(info: wire::RouterInfo) -> Self {
        Self {
            factory_mac: MacAddress::new(&info.mac),
            model: info.model,
            firmware_version: info.firmware_version,
        }
    }
}

/// Boot time is left unset; the store smooths it against the previous value.
impl From<wire::SystemStatusResponse> for SystemStatus {
    fn from(resp: wire::SystemStatusResponse) -> Self {
        let stats = resp.system;
        let load = |i: usize| stats.load_average.get(i).copied();
        Self {
            cpu_temperature: stats.cpu.and_then(|cpu| cpu.temperature),
            load_average: [load(0), load(1), load(2)],
            uptime_secs: stats.uptime,
            boot_time: None,
        }
    }
}

impl From<wire::WifiIface> for WifiInterface {
    fn from(iface: wire::WifiIface) -> Self {
        Self {
            name: iface.name,
            enabled: iface.enabled,
            ssid: iface.ssid,
            guest: iface.guest,
            hidden: iface.hidden,
            encryption: iface.encryption,
            band: iface.band,
        }
    }
}

impl From<wire::WireGuardPeer> for WireGuardClient {
    fn from(peer: wire::WireGuardPeer) -> Self {
        Self::configured(peer.name, peer.group_id, peer.peer_id)
    }
}

impl From<wire::WireGuardState> for WireGuardActivity {
    fn from(state: wire::WireGuardState) -> Self {
        Self {
            connected: state.is_connected(),
            peer_id: state.peer_id,
            tunnel_id: state.tunnel_id,
        }
    }
}

// ── Multi-WAN ────────────────────────────────────────────────────────

impl From<wire::MultiWanStatus> for MultiWanState {
    fn from(status: wire::MultiWanStatus) -> Self {
        Self {
            mode: MultiWanMode::from_code(status.mode),
            interfaces: status.interfaces.into_iter().map(WanInterface::from).collect(),
        }
    }
}

impl From<wire::WanInterfaceStatus> for WanInterface {
    fn from(iface: wire::WanInterfaceStatus) -> Self {
        Self {
            name: iface.interface,
            enabled: iface.enabled,
            ipv4_online: iface.ipv4.map(|s| s.online),
            ipv6_online: iface.ipv6.map(|s| s.online),
            metric: iface.metric,
            weight: iface.weight,
            modem: iface.modem.map(ModemInfo::from),
        }
    }
}

impl From<wire::ModemStatus> for ModemInfo {
    fn from(modem: wire::ModemStatus) -> Self {
        Self {
            signal: modem.signal.map(|s| ModemSignal {
                strength: s.strength,
                rssi: s.rssi,
                rsrp: s.rsrp,
                rsrq: s.rsrq,
                sinr: s.sinr,
                mode: s.mode,
            }),
            sim: modem.sim.map(|s| SimInfo {
                operator: s.operator,
                iccid: s.iccid,
                phone_number: s.phone_number,
                mcc: s.mcc,
                mnc: s.mnc,
                status: s.status,
                slot: s.slot,
            }),
            cells: modem.cells.into_iter().map(CellInfo::from).collect(),
        }
    }
}

impl From<wire::CellEntry> for CellInfo {
    fn from(cell: wire::CellEntry) -> Self {
        Self {
            cell_type: cell.cell_type,
            mode: cell.mode,
            band: cell.band,
            id: cell.id,
            rsrp: cell.rsrp,
            rsrq: cell.rsrq,
            sinr: cell.sinr,
            rssi: cell.rssi,
            ul_bandwidth: cell.ul_bandwidth,
            dl_bandwidth: cell.dl_bandwidth,
            channel: cell.channel,
        }
    }
}
