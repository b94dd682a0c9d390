//! Router status: identity, system metrics and Tailscale summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use glinet_core::model::Connection as DeviceConnection;
use glinet_core::{Router, TailscaleStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util::format_secs;

#[derive(Debug, Serialize)]
struct StatusView {
    name: String,
    model: String,
    firmware: Option<String>,
    url: Option<String>,
    macs: Vec<String>,
    uptime_secs: Option<u64>,
    boot_time: Option<DateTime<Utc>>,
    load_average: [Option<f64>; 3],
    cpu_temperature: Option<f64>,
    clients_connected: usize,
    devices_tracked: usize,
    tailscale: TailscaleStatus,
    last_refresh: Option<DateTime<Utc>>,
}

fn build(router: &Router) -> Result<StatusView, CliError> {
    let info = router.device_info()?;
    let store = router.store();
    let system = store.system_status().map(|s| (*s).clone()).unwrap_or_default();

    Ok(StatusView {
        name: info.name,
        model: info.model,
        firmware: info.sw_version,
        url: info.configuration_url.map(String::from),
        macs: info
            .connections
            .iter()
            .map(|DeviceConnection::Mac(mac)| mac.to_string())
            .collect(),
        uptime_secs: system.uptime_secs,
        boot_time: system.boot_time,
        load_average: system.load_average,
        cpu_temperature: system.cpu_temperature,
        clients_connected: store.connected_count(),
        devices_tracked: store.device_count(),
        tailscale: store.tailscale(),
        last_refresh: store.last_refresh(),
    })
}

fn detail(s: &StatusView) -> String {
    let load = s
        .load_average
        .iter()
        .map(|l| l.map_or_else(|| "-".into(), |v| format!("{v:.2}")))
        .collect::<Vec<_>>()
        .join(" ");
    let tailscale = if s.tailscale.configured {
        match s.tailscale.connected {
            Some(true) => "connected",
            Some(false) => "disconnected",
            None => "unknown",
        }
    } else {
        "not configured"
    };

    [
        format!("Router:    {}", s.name),
        format!("Model:     {}", s.model),
        format!("Firmware:  {}", s.firmware.as_deref().unwrap_or("-")),
        format!("URL:       {}", s.url.as_deref().unwrap_or("-")),
        format!("MAC:       {}", s.macs.join(", ")),
        format!("Uptime:    {}", s.uptime_secs.map_or_else(|| "-".into(), format_secs)),
        format!("Booted:    {}", or_dash(s.boot_time.map(|t| t.to_rfc3339()))),
        format!("Load:      {load}"),
        format!(
            "CPU temp:  {}",
            s.cpu_temperature.map_or_else(|| "-".into(), |t| format!("{t:.1} °C"))
        ),
        format!("Clients:   {} connected, {} tracked", s.clients_connected, s.devices_tracked),
        format!("Tailscale: {tailscale}"),
    ]
    .join("\n")
}

pub fn handle(router: &Router, global: &GlobalOpts) -> Result<(), CliError> {
    let view = build(router)?;
    let out = output::render_single(&global.output, &view, detail, |s| s.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
