//! Long-running presence watcher.
//!
//! Keeps the router's poll task running, prints an event whenever a
//! tracked device arrives or leaves, and persists the session token and
//! known devices as they change so a restart resumes where it left off.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use glinet_core::{ConnectedDevice, MacAddress, RouterState};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// First sighting of a device.
    New,
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceEvent {
    pub time: DateTime<Utc>,
    pub event: EventKind,
    pub mac: MacAddress,
    pub name: String,
    pub ip: Option<std::net::IpAddr>,
}

fn describe(e: &PresenceEvent) -> String {
    let verb = match e.event {
        EventKind::New => "joined",
        EventKind::Home => "is home",
        EventKind::Away => "left",
    };
    format!(
        "{} {} ({}) {verb}",
        e.time.format("%H:%M:%S"),
        e.name,
        e.mac
    )
}

/// Compare a device snapshot against the presence seen so far and return
/// one event per device whose presence changed.
pub fn presence_changes(
    known: &mut HashMap<MacAddress, bool>,
    snapshot: &[Arc<ConnectedDevice>],
    now: DateTime<Utc>,
) -> Vec<PresenceEvent> {
    let mut events = Vec::new();
    for device in snapshot {
        let previous = known.insert(device.mac.clone(), device.connected);
        let kind = match (previous, device.connected) {
            (None, true) => EventKind::New,
            (Some(false), true) => EventKind::Home,
            (Some(true), false) => EventKind::Away,
            _ => continue,
        };
        events.push(PresenceEvent {
            time: now,
            event: kind,
            mac: device.mac.clone(),
            name: device.name.clone(),
            ip: device.ip,
        });
    }
    events
}

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let conn = super::connect(global, true).await?;
    let save = !args.no_save;
    if let Some(secs) = args.consider_home {
        conn.router.set_consider_home(Duration::from_secs(secs));
    }

    let mut devices = conn.router.devices();
    let mut known: HashMap<MacAddress, bool> = devices
        .current()
        .iter()
        .map(|d| (d.mac.clone(), d.connected))
        .collect();
    let mut state_rx = conn.router.state();
    let mut token_rx = conn.router.session().subscribe_token();

    if !global.quiet {
        let home = known.values().filter(|c| **c).count();
        let name = conn
            .router
            .identity()
            .map_or_else(|| "router".into(), glinet_core::RouterIdentity::name);
        eprintln!(
            "Watching {name}: {home} of {} devices home (consider-home {}s). Ctrl-C to stop.",
            known.len(),
            conn.router.consider_home().as_secs()
        );
    }
    if save {
        conn.save_state();
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted, shutting down");
                break Ok(());
            }
            changed = devices.changed() => {
                let Some(snap) = changed else {
                    break Ok(());
                };
                for event in presence_changes(&mut known, &snap, Utc::now()) {
                    match output::render_single(&global.output, &event, describe, |e| {
                        e.mac.to_string()
                    }) {
                        Ok(out) => output::print_output(&out, global.quiet),
                        Err(e) => tracing::warn!(error = %e, "failed to render event"),
                    }
                }
                if save {
                    conn.save_state();
                }
            }
            Ok(()) = token_rx.changed() => {
                info!("session token renewed");
                if save {
                    conn.save_state();
                }
            }
            Ok(()) = state_rx.changed() => {
                let state = *state_rx.borrow_and_update();
                info!(%state, "router state changed");
                if state == RouterState::AuthFailed {
                    break Err(CliError::AuthFailed {
                        message: "the router rejected the stored credentials".into(),
                        profile: conn.profile_name.clone(),
                    });
                }
            }
        }
    };

    conn.close(save).await;
    outcome
}
