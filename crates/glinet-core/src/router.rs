// ── Router abstraction ──
//
// Full lifecycle management for one router: session setup, the background
// poll loop, command routing, and reactive data access through the
// DataStore.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use glinet_api::models::TailscaleConnection;
use glinet_api::{GlinetClient, RouterApi, TlsMode, TransportConfig};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{RouterConfig, TlsVerification, clamp_consider_home};
use crate::error::{CoreError, FailureKind};
use crate::model::{
    ClientReport, ConnectedDevice, DeviceInfo, MacAddress, MultiWanState, RouterIdentity,
    SystemStatus, TailscaleStatus, WifiInterface, WireGuardActivity, WireGuardClient,
};
use crate::session::RouterSession;
use crate::store::DataStore;
use crate::stream::EntityStream;

const COMMAND_CHANNEL_SIZE: usize = 16;

// ── RouterState ──────────────────────────────────────────────────

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RouterState {
    Disconnected,
    Connecting,
    Connected,
    /// Credentials were rejected; the poll loop has stopped.
    AuthFailed,
    ShutDown,
}

// ── Router ───────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<RouterInner>`. Owns the session, the
/// cached state and the background tasks of one router; every consumer
/// holds a clone and re-reads the store when notified.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    config: RouterConfig,
    session: RouterSession,
    store: Arc<DataStore>,
    identity: OnceLock<RouterIdentity>,
    consider_home: watch::Sender<Duration>,
    state: watch::Sender<RouterState>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Router {
    /// Create a router handle over an existing API implementation. Does
    /// NOT contact the router; call [`setup()`](Self::setup) for that.
    pub fn new(config: RouterConfig, api: Arc<dyn RouterApi>) -> Self {
        let session = RouterSession::new(api, &config);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let consider_home = watch::channel(clamp_consider_home(config.consider_home.as_secs())).0;

        Self {
            inner: Arc::new(RouterInner {
                config,
                session,
                store: Arc::new(DataStore::new()),
                identity: OnceLock::new(),
                consider_home,
                state: watch::channel(RouterState::Disconnected).0,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a router handle talking JSON-RPC over HTTP.
    pub fn from_config(config: RouterConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = GlinetClient::new(config.url.clone(), &transport)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn session(&self) -> &RouterSession {
        &self.inner.session
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Set the router up.
    ///
    /// Establishes the session, fetches the router identity, runs the
    /// first full poll and spawns the background tasks. Returns
    /// `AuthFailed` for bad credentials and `NotReady` when the router
    /// could not be reached.
    pub async fn setup(&self) -> Result<(), CoreError> {
        self.inner.state.send_replace(RouterState::Connecting);

        if let Err(e) = self.connect_session().await {
            let state = if matches!(e, CoreError::AuthFailed { .. }) {
                RouterState::AuthFailed
            } else {
                RouterState::Disconnected
            };
            self.inner.state.send_replace(state);
            return Err(e);
        }

        let mut handles = self.inner.task_handles.lock().await;
        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let router = self.clone();
            handles.push(tokio::spawn(command_processor_task(router, rx)));
        }

        let interval = self.inner.config.poll_interval;
        if !interval.is_zero() {
            let router = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(poll_task(router, interval, cancel)));
        }
        drop(handles);

        self.inner.state.send_replace(RouterState::Connected);
        info!(url = %self.inner.config.url, "router set up");
        Ok(())
    }

    async fn connect_session(&self) -> Result<(), CoreError> {
        self.inner.session.initialize().await?;

        let identity = self.fetch_identity().await?;
        debug!(model = %identity.model, mac = %identity.factory_mac, "router identified");
        // A repeated setup keeps the first identity.
        let _ = self.inner.identity.set(identity);

        self.update_all().await
    }

    /// `router_info`, retried once when a stored token turns out to be
    /// stale. Anything but bad credentials is `NotReady`.
    async fn fetch_identity(&self) -> Result<RouterIdentity, CoreError> {
        let session = &self.inner.session;
        let info = match session
            .invoke("router_info", |api| async move { api.router_info().await })
            .await
        {
            Ok(info) => info,
            Err(e) if e.failure_kind() == Some(FailureKind::TokenRejected) => {
                debug!("stored token rejected during setup, retrying with a fresh login");
                session
                    .invoke("router_info", |api| async move { api.router_info().await })
                    .await
                    .map_err(not_ready)?
            }
            Err(e) => return Err(not_ready(e)),
        };
        Ok(RouterIdentity::from(info))
    }

    /// Stop the background tasks. Cached state stays readable.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.state.send_replace(RouterState::ShutDown);
        debug!("router shut down");
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Run one full poll. Steps run in order and each one tolerates its
    /// own failure; only `AuthFailed` aborts the tick.
    pub async fn update_all(&self) -> Result<(), CoreError> {
        self.update_system_status().await?;
        self.update_device_trackers().await?;
        self.update_wifi_interfaces().await?;
        self.update_wireguard().await?;
        self.update_tailscale().await?;
        self.update_multiwan().await?;

        self.inner.store.mark_refreshed(Utc::now());
        debug!(
            devices = self.inner.store.device_count(),
            connected = self.inner.store.connected_count(),
            "poll complete"
        );
        Ok(())
    }

    pub async fn update_system_status(&self) -> Result<(), CoreError> {
        let status = self
            .inner
            .session
            .call("system_status", |api| async move { api.system_status().await })
            .await?;
        if let Some(status) = status {
            self.inner
                .store
                .apply_system_status(SystemStatus::from(status), Utc::now());
        }
        Ok(())
    }

    pub async fn update_device_trackers(&self) -> Result<(), CoreError> {
        let entries = self
            .inner
            .session
            .call("connected_clients", |api| async move {
                api.connected_clients().await
            })
            .await?;

        let Some(entries) = entries else {
            debug!("no client list this tick, device trackers unchanged");
            return Ok(());
        };
        if entries.is_empty() {
            warn!("router returned no connected devices");
            self.inner.store.record_empty_client_snapshot();
            return Ok(());
        }

        let reports: Vec<ClientReport> = entries.into_iter().map(ClientReport::from).collect();
        let created = self
            .inner
            .store
            .apply_client_snapshot(reports, Utc::now(), self.consider_home());
        if !created.is_empty() {
            info!(count = created.len(), "new devices detected");
        }
        Ok(())
    }

    pub async fn update_wifi_interfaces(&self) -> Result<(), CoreError> {
        let interfaces = self
            .inner
            .session
            .call("wifi_interfaces", |api| async move { api.wifi_interfaces().await })
            .await?;
        if let Some(interfaces) = interfaces {
            self.inner
                .store
                .replace_wifi_interfaces(interfaces.into_iter().map(WifiInterface::from).collect());
        }
        Ok(())
    }

    /// Rebuild the peer list, then mark the active peer.
    pub async fn update_wireguard(&self) -> Result<(), CoreError> {
        let session = &self.inner.session;
        let store = &self.inner.store;

        let Some(peers) = session
            .call("wireguard_clients", |api| async move {
                api.wireguard_clients().await
            })
            .await?
        else {
            return Ok(());
        };
        store.replace_wireguard_clients(peers.into_iter().map(WireGuardClient::from).collect());

        if store.wireguard_clients_snapshot().is_empty() {
            debug!("no WireGuard clients configured, nothing to update");
            return Ok(());
        }

        let state = session
            .call("wireguard_state", |api| async move { api.wireguard_state().await })
            .await?;
        if let Some(state) = state {
            store.apply_wireguard_activity(WireGuardActivity::from(state));
        }
        Ok(())
    }

    pub async fn update_tailscale(&self) -> Result<(), CoreError> {
        let session = &self.inner.session;

        let config = match session
            .call("tailscale_config", |api| async move { api.tailscale_config().await })
            .await?
        {
            None => return Ok(()),
            Some(None) => {
                self.inner.store.set_tailscale(TailscaleStatus::not_configured());
                return Ok(());
            }
            Some(Some(config)) => config,
        };
        let connection = session
            .call("tailscale_state", |api| async move { api.tailscale_state().await })
            .await?;

        self.inner.store.set_tailscale(TailscaleStatus {
            configured: true,
            lan_enabled: config.lan_enabled,
            connected: Some(connection == Some(TailscaleConnection::Connected)),
        });
        Ok(())
    }

    pub async fn update_multiwan(&self) -> Result<(), CoreError> {
        let status = self
            .inner
            .session
            .call("multiwan_state", |api| async move { api.multiwan_state().await })
            .await?;
        if let Some(status) = status {
            self.inner.store.replace_multiwan(MultiWanState::from(status));
        }
        Ok(())
    }

    // ── Options ──────────────────────────────────────────────────

    /// Seed devices known from an earlier run so they are tracked before
    /// the first poll. Returns how many were added.
    pub fn restore_devices(
        &self,
        known: impl IntoIterator<Item = (MacAddress, Option<String>)>,
    ) -> usize {
        let added = self.inner.store.restore_devices(known, Utc::now());
        if added > 0 {
            debug!(count = added, "restored known devices");
        }
        added
    }

    /// Change the consider-home window; takes effect on the next poll.
    pub fn set_consider_home(&self, window: Duration) {
        let window = clamp_consider_home(window.as_secs());
        self.inner.consider_home.send_replace(window);
        info!(seconds = window.as_secs(), "consider-home window updated");
    }

    pub fn consider_home(&self) -> Duration {
        *self.inner.consider_home.borrow()
    }

    // ── Identity ─────────────────────────────────────────────────

    /// Router identity, available once [`setup()`](Self::setup) has run.
    pub fn identity(&self) -> Option<&RouterIdentity> {
        self.inner.identity.get()
    }

    /// Device-info record for the router itself.
    pub fn device_info(&self) -> Result<DeviceInfo, CoreError> {
        let identity = self.require_identity()?;
        DeviceInfo::for_router(
            identity,
            self.inner.config.unique_id.as_deref(),
            &self.inner.config.url,
        )
    }

    /// Device-info record for one WAN interface, attached to the router.
    pub fn interface_device_info(&self, iface_name: &str) -> Result<DeviceInfo, CoreError> {
        let identity = self.require_identity()?;
        Ok(DeviceInfo::for_interface(
            identity,
            self.inner.config.unique_id.as_deref(),
            iface_name,
        ))
    }

    fn require_identity(&self) -> Result<&RouterIdentity, CoreError> {
        self.identity().ok_or_else(|| CoreError::NotReady {
            reason: "router identity not fetched yet".into(),
        })
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against the router.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.state.borrow() != RouterState::Connected {
            return Err(disconnected());
        }

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| disconnected())?;

        rx.await.map_err(|_| disconnected())?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: set up, run closure, shut down.
    ///
    /// Disables the poll task since the caller only needs a single
    /// snapshot.
    pub async fn oneshot<F, Fut, T>(config: RouterConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Router) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = Duration::ZERO;

        let router = Router::from_config(cfg)?;
        router.setup().await?;
        let result = f(router.clone()).await;
        router.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    pub fn state(&self) -> watch::Receiver<RouterState> {
        self.inner.state.subscribe()
    }

    pub fn current_state(&self) -> RouterState {
        *self.inner.state.borrow()
    }

    // ── Snapshot accessors (delegate to DataStore) ───────────────

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<ConnectedDevice>>> {
        self.inner.store.devices_snapshot()
    }

    pub fn wifi_interfaces_snapshot(&self) -> Arc<Vec<Arc<WifiInterface>>> {
        self.inner.store.wifi_interfaces_snapshot()
    }

    pub fn wireguard_clients_snapshot(&self) -> Arc<Vec<Arc<WireGuardClient>>> {
        self.inner.store.wireguard_clients_snapshot()
    }

    // ── Stream accessors (delegate to DataStore) ─────────────────

    pub fn devices(&self) -> EntityStream<ConnectedDevice> {
        self.inner.store.subscribe_devices()
    }

    pub fn wifi_interfaces(&self) -> EntityStream<WifiInterface> {
        self.inner.store.subscribe_wifi_interfaces()
    }

    pub fn wireguard_clients(&self) -> EntityStream<WireGuardClient> {
        self.inner.store.subscribe_wireguard_clients()
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Poll the router every `interval` until cancelled or credentials are
/// rejected.
async fn poll_task(router: Router, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // setup already ran the first poll

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match router.update_all().await {
                    Ok(()) => {}
                    Err(e @ CoreError::AuthFailed { .. }) => {
                        error!(error = %e, "credentials rejected, stopping poll loop");
                        router.inner.state.send_replace(RouterState::AuthFailed);
                        break;
                    }
                    Err(e) => warn!(error = %e, "poll failed"),
                }
            }
        }
    }
}

/// Process commands one at a time from the mpsc channel.
async fn command_processor_task(router: Router, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = router.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let operation = envelope.command.operation();
                let result = route_command(&router, envelope.command).await;
                if let Err(ref e) = result {
                    error!(operation, error = %e, "command failed");
                }
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Route a command to its remote call and refresh what it changed.
/// Cached state is never rolled back on failure.
async fn route_command(router: &Router, cmd: Command) -> Result<CommandResult, CoreError> {
    let session = router.session();
    let store = router.store();
    let operation = cmd.operation();

    match cmd {
        Command::Reboot => {
            session
                .invoke(operation, |api| async move { api.reboot().await })
                .await?;
            info!("reboot requested");
            Ok(CommandResult::Rebooting)
        }

        Command::SetWifiEnabled { iface, enabled } => {
            if store.wifi_interface(&iface).is_none() {
                return Err(CoreError::NotFound {
                    entity_type: "WiFi interface".into(),
                    identifier: iface,
                });
            }
            let name = iface.clone();
            session
                .invoke(operation, move |api| async move {
                    api.set_wifi_enabled(&name, enabled).await
                })
                .await?;
            info!(iface = %iface, enabled, "WiFi interface switched");
            router.update_wifi_interfaces().await?;
            Ok(CommandResult::Ok)
        }

        Command::StartWireGuard { peer_id } => {
            let tunnel_id = wireguard_tunnel(store, peer_id, operation)?;
            session
                .invoke(operation, move |api| async move {
                    api.wireguard_start(tunnel_id).await
                })
                .await?;
            store.set_wireguard_connected(peer_id, true);
            Ok(CommandResult::Ok)
        }

        Command::StopWireGuard { peer_id } => {
            let tunnel_id = wireguard_tunnel(store, peer_id, operation)?;
            session
                .invoke(operation, move |api| async move {
                    api.wireguard_stop(tunnel_id).await
                })
                .await?;
            store.set_wireguard_connected(peer_id, false);
            Ok(CommandResult::Ok)
        }

        Command::StartTailscale => {
            session
                .invoke(operation, |api| async move { api.tailscale_start().await })
                .await?;
            router.update_tailscale().await?;
            Ok(CommandResult::Ok)
        }

        Command::StopTailscale => {
            session
                .invoke(operation, |api| async move { api.tailscale_stop().await })
                .await?;
            router.update_tailscale().await?;
            Ok(CommandResult::Ok)
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the router configuration.
fn build_transport(config: &RouterConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

/// Start/stop address a tunnel, which is only known once the router has
/// reported the peer as active at least once.
fn wireguard_tunnel(store: &DataStore, peer_id: u32, operation: &str) -> Result<u32, CoreError> {
    let client = store
        .wireguard_client(peer_id)
        .ok_or_else(|| CoreError::NotFound {
            entity_type: "WireGuard client".into(),
            identifier: peer_id.to_string(),
        })?;
    client.tunnel_id.ok_or_else(|| CoreError::Unsupported {
        operation: operation.into(),
        reason: format!("no tunnel id known for WireGuard client {:?}", client.name),
    })
}

fn not_ready(err: CoreError) -> CoreError {
    match err {
        CoreError::AuthFailed { .. } | CoreError::NotReady { .. } => err,
        other => CoreError::NotReady {
            reason: other.to_string(),
        },
    }
}

fn disconnected() -> CoreError {
    CoreError::NotReady {
        reason: "router is not connected".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_modes_map_one_to_one() {
        assert!(matches!(
            tls_to_transport(&TlsVerification::SystemDefaults),
            TlsMode::System
        ));
        assert!(matches!(
            tls_to_transport(&TlsVerification::DangerAcceptInvalid),
            TlsMode::DangerAcceptInvalid
        ));
    }

    #[test]
    fn setup_errors_become_not_ready() {
        let err = not_ready(CoreError::Internal("boom".into()));
        assert!(matches!(err, CoreError::NotReady { .. }));
        let err = not_ready(CoreError::AuthFailed {
            message: "denied".into(),
        });
        assert!(matches!(err, CoreError::AuthFailed { .. }));
    }
}
