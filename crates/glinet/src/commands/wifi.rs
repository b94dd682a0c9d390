//! WiFi interface command handlers.

use std::sync::Arc;

use tabled::Tabled;

use glinet_core::{Command as CoreCommand, Router, WifiInterface};

use crate::cli::{GlobalOpts, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Tabled)]
struct WifiRow {
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Hidden")]
    hidden: String,
    #[tabled(rename = "Encryption")]
    encryption: String,
}

impl WifiRow {
    fn new(w: &Arc<WifiInterface>, color: bool) -> Self {
        Self {
            name: w.name.clone(),
            ssid: w.ssid.clone(),
            band: or_dash(w.band.as_deref()),
            state: output::on_off(w.enabled, color),
            guest: if w.guest { "yes".into() } else { String::new() },
            hidden: if w.hidden { "yes".into() } else { String::new() },
            encryption: or_dash(w.encryption.as_deref()),
        }
    }
}

pub async fn handle(router: &Router, args: WifiArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (iface, enabled) = match args.command.unwrap_or(WifiCommand::List) {
        WifiCommand::List => return list(router, global),
        WifiCommand::Enable { iface } => (iface, true),
        WifiCommand::Disable { iface } => (iface, false),
    };

    router
        .execute(CoreCommand::SetWifiEnabled {
            iface: iface.clone(),
            enabled,
        })
        .await?;

    if !global.quiet {
        let state = router
            .store()
            .wifi_interface(&iface)
            .map_or(enabled, |w| w.enabled);
        eprintln!("{iface} is now {}", output::on_off(state, false));
    }
    Ok(())
}

fn list(router: &Router, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let snap = router.wifi_interfaces_snapshot();
    let out = output::render_list(
        &global.output,
        &snap,
        |w| WifiRow::new(w, color),
        |w| w.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
