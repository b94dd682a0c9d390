//! WireGuard and Tailscale command handlers.

use std::sync::Arc;

use tabled::Tabled;

use glinet_core::{Command as CoreCommand, Router, TailscaleStatus, WireGuardClient};

use crate::cli::{
    GlobalOpts, TailscaleArgs, TailscaleCommand, WireGuardArgs, WireGuardCommand,
};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── WireGuard ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PeerRow {
    #[tabled(rename = "Peer")]
    peer_id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Group")]
    group_id: u32,
    #[tabled(rename = "Tunnel")]
    tunnel_id: String,
    #[tabled(rename = "State")]
    state: String,
}

impl PeerRow {
    fn new(p: &Arc<WireGuardClient>, color: bool) -> Self {
        Self {
            peer_id: p.peer_id,
            name: p.name.clone(),
            group_id: p.group_id,
            tunnel_id: or_dash(p.tunnel_id),
            state: output::on_off(p.connected, color),
        }
    }
}

pub async fn handle_wireguard(
    router: &Router,
    args: WireGuardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (peer_id, cmd) = match args.command.unwrap_or(WireGuardCommand::List) {
        WireGuardCommand::List => {
            let color = output::should_color(&global.color);
            let snap = router.wireguard_clients_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |p| PeerRow::new(p, color),
                |p| p.peer_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        WireGuardCommand::Start { peer_id } => (peer_id, CoreCommand::StartWireGuard { peer_id }),
        WireGuardCommand::Stop { peer_id } => (peer_id, CoreCommand::StopWireGuard { peer_id }),
    };

    router.execute(cmd).await?;

    if !global.quiet {
        if let Some(peer) = router.store().wireguard_client(peer_id) {
            let state = if peer.connected { "connected" } else { "disconnected" };
            eprintln!("WireGuard client {:?} {state}", peer.name);
        }
    }
    Ok(())
}

// ── Tailscale ───────────────────────────────────────────────────────

fn tailscale_detail(t: &TailscaleStatus) -> String {
    if !t.configured {
        return "Tailscale: not configured".into();
    }
    [
        format!(
            "Connected:   {}",
            or_dash(t.connected.map(|c| if c { "yes" } else { "no" }))
        ),
        format!(
            "LAN access:  {}",
            or_dash(t.lan_enabled.map(|c| if c { "enabled" } else { "disabled" }))
        ),
    ]
    .join("\n")
}

pub async fn handle_tailscale(
    router: &Router,
    args: TailscaleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cmd = match args.command.unwrap_or(TailscaleCommand::Status) {
        TailscaleCommand::Status => None,
        TailscaleCommand::Up => Some(CoreCommand::StartTailscale),
        TailscaleCommand::Down => Some(CoreCommand::StopTailscale),
    };
    if let Some(cmd) = cmd {
        router.execute(cmd).await?;
    }

    let status = router.store().tailscale();
    let out = output::render_single(&global.output, &status, tailscale_detail, |t| {
        t.connected.unwrap_or(false).to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
