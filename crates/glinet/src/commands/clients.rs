//! Client device command handlers.

use std::sync::Arc;

use tabled::Tabled;

use glinet_core::{ConnectedDevice, MacAddress, Router};

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

impl DeviceRow {
    fn new(d: &Arc<ConnectedDevice>, color: bool) -> Self {
        Self {
            name: d.name.clone(),
            mac: d.mac.to_string(),
            ip: or_dash(d.ip),
            interface: d.interface.to_string(),
            status: output::presence(d.connected, color),
            last_seen: d.last_seen.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn detail(d: &Arc<ConnectedDevice>) -> String {
    [
        format!("Name:       {}", d.name),
        format!("MAC:        {}", d.mac),
        format!("IP:         {}", or_dash(d.ip)),
        format!("Interface:  {}", d.interface),
        format!("Status:     {}", output::presence(d.connected, false)),
        format!("Last seen:  {}", d.last_seen.to_rfc3339()),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(router: &Router, args: ClientsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command.unwrap_or(ClientsCommand::List { all: false }) {
        ClientsCommand::List { all } => {
            let color = output::should_color(&global.color);
            let snap: Vec<_> = router
                .devices_snapshot()
                .iter()
                .filter(|d| all || d.connected)
                .cloned()
                .collect();
            let out = output::render_list(
                &global.output,
                &snap,
                |d| DeviceRow::new(d, color),
                |d| d.mac.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Get { mac } => {
            let found = router.store().device_by_mac(&MacAddress::new(&mac));
            match found {
                Some(d) => {
                    let out = output::render_single(&global.output, &d, detail, |d| {
                        d.mac.to_string()
                    })?;
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "client".into(),
                    identifier: mac,
                    list_command: "clients list --all".into(),
                }),
            }
        }
    }
}
