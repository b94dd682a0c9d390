// ── Store reconciliation ──
//
// Applies fresh poll results to the store. Every function takes `now`
// explicitly so polls are reproducible in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::DataStore;
use crate::model::{
    ClientReport, ConnectedDevice, MacAddress, MultiWanState, SystemStatus, TailscaleStatus,
    WifiInterface, WireGuardActivity, WireGuardClient, smooth_boot_time,
};

impl DataStore {
    // ── Devices ──────────────────────────────────────────────────────

    /// Reconcile a non-empty client snapshot against the tracked devices.
    ///
    /// Reported devices are updated, unreported ones age out after
    /// `consider_home`, and reports with a name or alias that are not yet
    /// tracked become new devices. Publishes "devices updated" always and
    /// "new device" when something was created. Returns the created MACs.
    pub(crate) fn apply_client_snapshot(
        &self,
        reports: Vec<ClientReport>,
        now: DateTime<Utc>,
        consider_home: Duration,
    ) -> Vec<MacAddress> {
        let snapshot_len = reports.len();
        let mut by_mac: HashMap<MacAddress, ClientReport> =
            reports.into_iter().map(|r| (r.mac.clone(), r)).collect();

        for key in self.devices.keys() {
            let Some(current) = self.devices.get(&key) else {
                continue;
            };
            let mut device = (*current).clone();
            match by_mac.remove(&device.mac) {
                Some(report) => device.apply_report(&report, now),
                None => device.mark_absent(now, consider_home),
            }
            if device != *current {
                self.devices.upsert_silent(key, device);
            }
        }

        let mut created = Vec::new();
        let mut remaining: Vec<ClientReport> = by_mac.into_values().collect();
        remaining.sort_by(|a, b| a.mac.cmp(&b.mac));
        for report in remaining.into_iter().filter(ClientReport::is_trackable) {
            let mut device = ConnectedDevice::restored(report.mac.clone(), None, now);
            device.apply_report(&report, now);
            debug!(mac = %device.mac, name = %device.name, "tracking new device");
            self.devices.upsert_silent(device.mac.to_string(), device);
            created.push(report.mac);
        }

        self.devices.flush();
        self.connected_count.send_replace(snapshot_len);
        self.devices_updated.send_modify(|n| *n += 1);
        if !created.is_empty() {
            self.new_devices.send_modify(|n| *n += 1);
        }
        created
    }

    /// A poll returned no clients at all.
    pub(crate) fn record_empty_client_snapshot(&self) {
        self.connected_count.send_replace(0);
    }

    /// Seed devices known from an earlier run. Devices already tracked are
    /// left alone. Returns how many were added.
    pub(crate) fn restore_devices(
        &self,
        known: impl IntoIterator<Item = (MacAddress, Option<String>)>,
        now: DateTime<Utc>,
    ) -> usize {
        let mut added = 0;
        for (mac, name) in known {
            if self.devices.get(mac.as_str()).is_some() {
                continue;
            }
            let device = ConnectedDevice::restored(mac, name, now);
            self.devices.upsert_silent(device.mac.to_string(), device);
            added += 1;
        }
        if added > 0 {
            self.devices.flush();
        }
        added
    }

    // ── WireGuard ────────────────────────────────────────────────────

    /// Rebuild the peer map from the configuration list. Every peer starts
    /// disconnected until activity is applied; a tunnel id already learned
    /// for the same peer is kept so it can be started again.
    pub(crate) fn replace_wireguard_clients(&self, peers: Vec<WireGuardClient>) {
        let peers: Vec<(String, WireGuardClient)> = peers
            .into_iter()
            .map(|mut peer| {
                if peer.tunnel_id.is_none() {
                    peer.tunnel_id = self
                        .wireguard_client(peer.peer_id)
                        .and_then(|known| known.tunnel_id);
                }
                (peer.key(), peer)
            })
            .collect();
        self.wireguard_clients.replace_all(peers);
    }

    /// Mark the active peer connected. A report without a peer means no
    /// tunnel is up.
    pub(crate) fn apply_wireguard_activity(&self, activity: WireGuardActivity) {
        for key in self.wireguard_clients.keys() {
            let Some(current) = self.wireguard_clients.get(&key) else {
                continue;
            };
            let mut client = (*current).clone();
            let is_active = activity.peer_id == Some(client.peer_id);
            client.connected = activity.connected && is_active;
            if is_active && activity.tunnel_id.is_some() {
                client.tunnel_id = activity.tunnel_id;
            }
            self.wireguard_clients.upsert_silent(key, client);
        }
        self.wireguard_clients.flush();
    }

    /// Optimistic update after a successful start/stop command.
    pub(crate) fn set_wireguard_connected(&self, peer_id: u32, connected: bool) {
        if let Some(current) = self.wireguard_client(peer_id) {
            let mut client = (*current).clone();
            client.connected = connected;
            self.wireguard_clients.upsert(client.key(), client);
        }
    }

    // ── WiFi / Multi-WAN / Tailscale ─────────────────────────────────

    pub(crate) fn replace_wifi_interfaces(&self, interfaces: Vec<WifiInterface>) {
        self.wifi_interfaces
            .replace_all(interfaces.into_iter().map(|i| (i.name.clone(), i)));
    }

    pub(crate) fn replace_multiwan(&self, state: MultiWanState) {
        self.multiwan.send_replace(Some(Arc::new(state)));
    }

    pub(crate) fn set_tailscale(&self, status: TailscaleStatus) {
        self.tailscale.send_replace(status);
    }

    // ── System ───────────────────────────────────────────────────────

    /// Store fresh metrics, smoothing the boot time against the previous
    /// sample.
    pub(crate) fn apply_system_status(&self, mut status: SystemStatus, now: DateTime<Utc>) {
        let previous = self.system_status().and_then(|s| s.boot_time);
        status.boot_time = status
            .uptime_secs
            .map(|uptime| smooth_boot_time(now, uptime, previous));
        self.system_status.send_replace(Some(Arc::new(status)));
    }

    pub(crate) fn mark_refreshed(&self, now: DateTime<Utc>) {
        self.last_refresh.send_replace(Some(now));
    }
}
