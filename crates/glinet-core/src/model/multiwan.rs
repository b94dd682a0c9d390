// ── Multi-WAN interfaces and cellular modems ──

use serde::{Deserialize, Serialize};
use strum::Display;

/// How the router spreads traffic across WAN uplinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum MultiWanMode {
    /// One uplink at a time, ordered by `metric`.
    #[default]
    Failover,
    /// Traffic split across uplinks by `weight`.
    LoadBalancing,
}

impl MultiWanMode {
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Self::LoadBalancing
        } else {
            Self::Failover
        }
    }
}

/// Human label for a well-known interface name; unknown names map to
/// themselves.
pub fn interface_label(name: &str) -> &str {
    match name {
        "modem_0001" => "Cellular",
        "wan" => "Ethernet 1",
        "wwan" => "Repeater",
        "secondwan" => "Ethernet 2",
        "tethering" => "Tethering",
        other => other,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiWanState {
    pub mode: MultiWanMode,
    pub interfaces: Vec<WanInterface>,
}

impl MultiWanState {
    pub fn interface(&self, name: &str) -> Option<&WanInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WanInterface {
    pub name: String,
    pub enabled: bool,
    pub ipv4_online: Option<bool>,
    pub ipv6_online: Option<bool>,
    pub metric: Option<u32>,
    pub weight: Option<u32>,
    pub modem: Option<ModemInfo>,
}

impl WanInterface {
    pub fn label(&self) -> &str {
        interface_label(&self.name)
    }

    /// Reachability of the preferred address family, falling back to the
    /// other family when the router does not report the preferred one.
    pub fn is_online(&self, prefer_ipv6: bool) -> bool {
        let (preferred, other) = if prefer_ipv6 {
            (self.ipv6_online, self.ipv4_online)
        } else {
            (self.ipv4_online, self.ipv6_online)
        };
        preferred.or(other).unwrap_or(false)
    }

    /// The figure that orders this uplink under the current mode.
    pub fn priority(&self, mode: MultiWanMode) -> Option<u32> {
        match mode {
            MultiWanMode::Failover => self.metric,
            MultiWanMode::LoadBalancing => self.weight,
        }
    }
}

// ── Modem ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModemInfo {
    pub signal: Option<ModemSignal>,
    pub sim: Option<SimInfo>,
    pub cells: Vec<CellInfo>,
}

impl ModemInfo {
    /// The cell best describing the current attachment, see [`select_cell`].
    pub fn serving_cell(&self) -> Option<CellInfo> {
        select_cell(&self.cells)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModemSignal {
    /// Bars, 0..=4 or so depending on firmware.
    pub strength: Option<i64>,
    pub rssi: Option<f64>,
    pub rsrp: Option<f64>,
    pub rsrq: Option<f64>,
    pub sinr: Option<f64>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimInfo {
    pub operator: Option<String>,
    pub iccid: Option<String>,
    pub phone_number: Option<String>,
    pub mcc: Option<String>,
    pub mnc: Option<String>,
    pub status: Option<String>,
    pub slot: Option<u8>,
}

impl SimInfo {
    /// `Sim 1`, `Sim 2`, ...
    pub fn slot_label(&self) -> Option<String> {
        self.slot.map(|slot| format!("Sim {slot}"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellInfo {
    pub cell_type: Option<String>,
    pub mode: Option<String>,
    pub band: Option<String>,
    pub id: Option<String>,
    pub rsrp: Option<f64>,
    pub rsrq: Option<f64>,
    pub sinr: Option<f64>,
    pub rssi: Option<f64>,
    pub ul_bandwidth: Option<String>,
    pub dl_bandwidth: Option<String>,
    pub channel: Option<u32>,
}

impl CellInfo {
    fn is_serving(&self) -> bool {
        self.cell_type.as_deref() == Some("servingcell")
    }

    fn mode_contains(&self, needle: &str) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|m| m.to_uppercase().contains(needle))
    }

    /// Bandwidth for display: downlink if known, else uplink.
    pub fn bandwidth(&self) -> Option<&str> {
        self.dl_bandwidth.as_deref().or(self.ul_bandwidth.as_deref())
    }

    /// `self` with every missing field filled in from `fallback`.
    pub fn merged_with(&self, fallback: &CellInfo) -> CellInfo {
        CellInfo {
            cell_type: first_text(&self.cell_type, &fallback.cell_type),
            mode: first_text(&self.mode, &fallback.mode),
            band: self.band.clone().or_else(|| fallback.band.clone()),
            id: first_text(&self.id, &fallback.id),
            rsrp: self.rsrp.or(fallback.rsrp),
            rsrq: self.rsrq.or(fallback.rsrq),
            sinr: self.sinr.or(fallback.sinr),
            rssi: self.rssi.or(fallback.rssi),
            ul_bandwidth: first_text(&self.ul_bandwidth, &fallback.ul_bandwidth),
            dl_bandwidth: first_text(&self.dl_bandwidth, &fallback.dl_bandwidth),
            channel: self.channel.filter(|c| *c != 0).or(fallback.channel),
        }
    }
}

fn first_text(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    primary
        .as_ref()
        .filter(|s| !s.is_empty())
        .or(fallback.as_ref())
        .cloned()
}

/// Pick the cell describing the modem's attachment.
///
/// On 5G NSA the NR serving cell carries the headline figures but often
/// lacks band or bandwidth, so it is completed from the LTE anchor (or
/// the first serving cell). Otherwise the first serving cell is used.
pub fn select_cell(cells: &[CellInfo]) -> Option<CellInfo> {
    let mut serving = cells.iter().filter(|c| c.is_serving());
    let first = serving.clone().next()?;
    let nr = serving.clone().find(|c| c.mode_contains("NR"));
    let lte = serving.find(|c| c.mode_contains("LTE"));

    match nr {
        Some(nr) => {
            let fallback = lte.unwrap_or(first);
            if std::ptr::eq(fallback, nr) {
                Some(nr.clone())
            } else {
                Some(nr.merged_with(fallback))
            }
        }
        None => Some(first.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cell(cell_type: &str, mode: &str) -> CellInfo {
        CellInfo {
            cell_type: Some(cell_type.into()),
            mode: Some(mode.into()),
            ..CellInfo::default()
        }
    }

    #[test]
    fn labels() {
        assert_eq!(interface_label("modem_0001"), "Cellular");
        assert_eq!(interface_label("secondwan"), "Ethernet 2");
        assert_eq!(interface_label("eth5"), "eth5");
    }

    #[test]
    fn online_prefers_requested_family() {
        let iface = WanInterface {
            name: "wan".into(),
            ipv4_online: Some(true),
            ipv6_online: Some(false),
            ..WanInterface::default()
        };
        assert!(iface.is_online(false));
        assert!(!iface.is_online(true));
    }

    #[test]
    fn online_falls_back_to_other_family() {
        let iface = WanInterface {
            name: "wan".into(),
            ipv4_online: Some(true),
            ..WanInterface::default()
        };
        assert!(iface.is_online(true));
        assert!(!WanInterface::default().is_online(false));
    }

    #[test]
    fn priority_follows_mode() {
        let iface = WanInterface {
            metric: Some(10),
            weight: Some(3),
            ..WanInterface::default()
        };
        assert_eq!(iface.priority(MultiWanMode::Failover), Some(10));
        assert_eq!(iface.priority(MultiWanMode::LoadBalancing), Some(3));
        assert_eq!(MultiWanMode::from_code(1), MultiWanMode::LoadBalancing);
        assert_eq!(MultiWanMode::from_code(0), MultiWanMode::Failover);
    }

    #[test]
    fn nr_cell_is_completed_from_lte_anchor() {
        let mut nr = cell("servingcell", "NR5G-NSA");
        nr.rsrp = Some(-90.0);
        nr.dl_bandwidth = Some(String::new());
        let mut lte = cell("servingcell", "LTE");
        lte.band = Some("B3".into());
        lte.rsrp = Some(-100.0);
        lte.dl_bandwidth = Some("20MHz".into());
        lte.id = Some("1A2B".into());

        let selected = select_cell(&[cell("neighbourcell", "LTE"), lte, nr]).unwrap();
        assert_eq!(selected.mode.as_deref(), Some("NR5G-NSA"));
        assert_eq!(selected.rsrp, Some(-90.0));
        assert_eq!(selected.band.as_deref(), Some("B3"));
        assert_eq!(selected.dl_bandwidth.as_deref(), Some("20MHz"));
        assert_eq!(selected.id.as_deref(), Some("1A2B"));
    }

    #[test]
    fn without_nr_first_serving_cell_wins() {
        let mut first = cell("servingcell", "WCDMA");
        first.id = Some("first".into());
        let selected = select_cell(&[cell("neighbourcell", "NR5G"), first, cell("servingcell", "LTE")]).unwrap();
        assert_eq!(selected.id.as_deref(), Some("first"));
    }

    #[test]
    fn no_serving_cell_is_none() {
        assert!(select_cell(&[cell("neighbourcell", "LTE")]).is_none());
        assert!(select_cell(&[]).is_none());
    }

    #[test]
    fn sim_slot_label() {
        let sim = SimInfo {
            slot: Some(2),
            ..SimInfo::default()
        };
        assert_eq!(sim.slot_label().as_deref(), Some("Sim 2"));
    }
}
