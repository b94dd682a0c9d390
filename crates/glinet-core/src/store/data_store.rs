// ── Central reactive data store ──
//
// Thread-safe storage for everything the poll loop caches about one
// router. Mutations are broadcast to subscribers via `watch` channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{
    ConnectedDevice, MacAddress, MultiWanState, SystemStatus, TailscaleStatus, WifiInterface,
    WireGuardClient,
};
use crate::stream::EntityStream;

/// Central reactive store for one router's cached state.
///
/// Reads are cheap snapshot clones; writes happen only from the poll loop
/// and from command handlers. Two payload-free notification counters
/// ("devices updated", "new device") tell subscribers when to re-read.
pub struct DataStore {
    pub(crate) devices: EntityCollection<ConnectedDevice>,
    pub(crate) wifi_interfaces: EntityCollection<WifiInterface>,
    pub(crate) wireguard_clients: EntityCollection<WireGuardClient>,
    pub(crate) system_status: watch::Sender<Option<Arc<SystemStatus>>>,
    pub(crate) tailscale: watch::Sender<TailscaleStatus>,
    pub(crate) multiwan: watch::Sender<Option<Arc<MultiWanState>>>,
    pub(crate) connected_count: watch::Sender<usize>,
    pub(crate) devices_updated: watch::Sender<u64>,
    pub(crate) new_devices: watch::Sender<u64>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self {
            devices: EntityCollection::new(),
            wifi_interfaces: EntityCollection::new(),
            wireguard_clients: EntityCollection::new(),
            system_status: watch::channel(None).0,
            tailscale: watch::channel(TailscaleStatus::not_configured()).0,
            multiwan: watch::channel(None).0,
            connected_count: watch::channel(0).0,
            devices_updated: watch::channel(0).0,
            new_devices: watch::channel(0).0,
            last_refresh: watch::channel(None).0,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<ConnectedDevice>>> {
        self.devices.snapshot()
    }

    pub fn wifi_interfaces_snapshot(&self) -> Arc<Vec<Arc<WifiInterface>>> {
        self.wifi_interfaces.snapshot()
    }

    pub fn wireguard_clients_snapshot(&self) -> Arc<Vec<Arc<WireGuardClient>>> {
        self.wireguard_clients.snapshot()
    }

    pub fn system_status(&self) -> Option<Arc<SystemStatus>> {
        self.system_status.borrow().clone()
    }

    pub fn tailscale(&self) -> TailscaleStatus {
        *self.tailscale.borrow()
    }

    pub fn multiwan(&self) -> Option<Arc<MultiWanState>> {
        self.multiwan.borrow().clone()
    }

    // ── Single-record lookups ────────────────────────────────────────

    pub fn device_by_mac(&self, mac: &MacAddress) -> Option<Arc<ConnectedDevice>> {
        self.devices.get(mac.as_str())
    }

    pub fn wifi_interface(&self, name: &str) -> Option<Arc<WifiInterface>> {
        self.wifi_interfaces.get(name)
    }

    pub fn wireguard_client(&self, peer_id: u32) -> Option<Arc<WireGuardClient>> {
        self.wireguard_clients.get(&peer_id.to_string())
    }

    /// Known device MACs, sorted.
    pub fn device_macs(&self) -> Vec<MacAddress> {
        self.devices.keys().into_iter().map(MacAddress::new).collect()
    }

    // ── Count accessors ──────────────────────────────────────────────

    /// Size of the last non-empty client snapshot (0 after an empty one).
    pub fn connected_count(&self) -> usize {
        *self.connected_count.borrow()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_devices(&self) -> EntityStream<ConnectedDevice> {
        EntityStream::new(self.devices.subscribe())
    }

    pub fn subscribe_wifi_interfaces(&self) -> EntityStream<WifiInterface> {
        EntityStream::new(self.wifi_interfaces.subscribe())
    }

    pub fn subscribe_wireguard_clients(&self) -> EntityStream<WireGuardClient> {
        EntityStream::new(self.wireguard_clients.subscribe())
    }

    pub fn subscribe_system_status(&self) -> watch::Receiver<Option<Arc<SystemStatus>>> {
        self.system_status.subscribe()
    }

    pub fn subscribe_tailscale(&self) -> watch::Receiver<TailscaleStatus> {
        self.tailscale.subscribe()
    }

    pub fn subscribe_multiwan(&self) -> watch::Receiver<Option<Arc<MultiWanState>>> {
        self.multiwan.subscribe()
    }

    /// Ticks after every device reconciliation.
    pub fn subscribe_device_updates(&self) -> watch::Receiver<u64> {
        self.devices_updated.subscribe()
    }

    /// Ticks when a reconciliation created at least one device.
    pub fn subscribe_new_devices(&self) -> watch::Receiver<u64> {
        self.new_devices.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last full poll completed, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    /// Version counter of the device collection, for change detection.
    pub fn devices_version(&self) -> u64 {
        self.devices.version()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
