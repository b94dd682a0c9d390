//! Multi-WAN uplink listing.

use serde::Serialize;
use tabled::Tabled;

use glinet_core::{MultiWanMode, Router, WanInterface};

use crate::cli::{GlobalOpts, WanArgs};
use crate::error::CliError;
use crate::output::{self, or_dash};

/// One uplink as shown to the user.
#[derive(Debug, Serialize)]
struct UplinkView {
    #[serde(flatten)]
    interface: WanInterface,
    label: String,
    device_name: Option<String>,
    online: bool,
    priority: Option<u32>,
}

#[derive(Tabled)]
struct UplinkRow {
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Cell")]
    cell: String,
}

impl UplinkRow {
    fn new(u: &UplinkView, color: bool) -> Self {
        let cell = u
            .interface
            .modem
            .as_ref()
            .and_then(glinet_core::model::ModemInfo::serving_cell)
            .map(|c| {
                let bandwidth = c.bandwidth().map(str::to_owned);
                [c.mode, c.band, bandwidth]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ")
            });
        Self {
            name: u.interface.name.clone(),
            label: u.label.clone(),
            enabled: output::on_off(u.interface.enabled, color),
            online: output::on_off(u.online, color),
            priority: or_dash(u.priority),
            cell: or_dash(cell.filter(|c| !c.is_empty())),
        }
    }
}

pub fn handle(router: &Router, args: &WanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(state) = router.store().multiwan() else {
        if !global.quiet {
            eprintln!("Router reported no multi-WAN state");
        }
        return Ok(());
    };

    let mode: MultiWanMode = state.mode;
    let views: Vec<UplinkView> = state
        .interfaces
        .iter()
        .map(|iface| UplinkView {
            label: iface.label().to_owned(),
            device_name: router.interface_device_info(&iface.name).ok().map(|d| d.name),
            online: iface.is_online(args.ipv6),
            priority: iface.priority(mode),
            interface: iface.clone(),
        })
        .collect();

    if !global.quiet && matches!(global.output, crate::cli::OutputFormat::Table) {
        eprintln!("Mode: {mode}");
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &views,
        |u| UplinkRow::new(u, color),
        |u| u.interface.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
