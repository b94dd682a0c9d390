// ── Tracked client devices ──

use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::mac::MacAddress;

/// How a client is attached, decoded from the router's integer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
pub enum InterfaceType {
    #[strum(to_string = "2.4GHz")]
    Wifi24,
    #[strum(to_string = "5GHz")]
    Wifi5,
    #[strum(to_string = "LAN")]
    Lan,
    #[strum(to_string = "2.4GHz Guest")]
    Wifi24Guest,
    #[strum(to_string = "5GHz Guest")]
    Wifi5Guest,
    #[default]
    Unknown,
    Dongle,
    #[strum(to_string = "Bypass Route")]
    BypassRoute,
}

impl InterfaceType {
    /// Decode the router's index; anything out of range is `Unknown`.
    pub fn from_index(index: Option<i64>) -> Self {
        match index {
            Some(0) => Self::Wifi24,
            Some(1) => Self::Wifi5,
            Some(2) => Self::Lan,
            Some(3) => Self::Wifi24Guest,
            Some(4) => Self::Wifi5Guest,
            Some(6) => Self::Dongle,
            Some(7) => Self::BypassRoute,
            _ => Self::Unknown,
        }
    }
}

/// One entry of a client-list snapshot, already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReport {
    pub mac: MacAddress,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub ip: Option<IpAddr>,
    pub online: bool,
    pub interface: InterfaceType,
}

impl ClientReport {
    /// Only clients the router knows a name or alias for are worth tracking.
    pub fn is_trackable(&self) -> bool {
        non_blank(self.alias.as_deref()).is_some() || non_blank(self.name.as_deref()).is_some()
    }

    /// Alias, else name (unless the router's `*` placeholder), else the MAC.
    pub fn display_name(&self) -> String {
        non_blank(self.alias.as_deref())
            .or_else(|| non_blank(self.name.as_deref()).filter(|n| *n != "*"))
            .map_or_else(|| self.mac.fallback_name(), str::to_owned)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A client the router has reported at some point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedDevice {
    pub mac: MacAddress,
    pub name: String,
    pub ip: Option<IpAddr>,
    pub interface: InterfaceType,
    pub last_seen: DateTime<Utc>,
    pub connected: bool,
}

impl ConnectedDevice {
    /// A device known from earlier runs but not yet seen in a snapshot.
    /// It starts away, with a last-seen time one day in the past.
    pub fn restored(mac: MacAddress, name: Option<String>, now: DateTime<Utc>) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| mac.fallback_name());
        Self {
            mac,
            name,
            ip: None,
            interface: InterfaceType::Unknown,
            last_seen: now - TimeDelta::days(1),
            connected: false,
        }
    }

    /// Update from a snapshot entry for this device.
    pub fn apply_report(&mut self, report: &ClientReport, now: DateTime<Utc>) {
        self.name = report.display_name();
        self.ip = report.ip;
        self.interface = report.interface;
        self.last_seen = now;
        self.connected = report.online;
    }

    /// Update for a snapshot that does not mention this device. A connected
    /// device stays connected until `consider_home` has passed since it
    /// was last seen.
    pub fn mark_absent(&mut self, now: DateTime<Utc>, consider_home: Duration) {
        if !self.connected {
            return;
        }
        let elapsed = (now - self.last_seen).to_std().unwrap_or_default();
        if elapsed >= consider_home {
            self.connected = false;
            self.ip = None;
        }
    }
}
