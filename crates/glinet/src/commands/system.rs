//! System command handlers.

use glinet_core::{Command as CoreCommand, CommandResult, Router};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn reboot(router: &Router, global: &GlobalOpts) -> Result<(), CliError> {
    let name = router.identity().map_or_else(|| "router".into(), |i| i.name());
    if !util::confirm(&format!("Reboot {name}?"), global.yes)? {
        return Ok(());
    }
    let result = router.execute(CoreCommand::Reboot).await?;
    if !global.quiet && result == CommandResult::Rebooting {
        eprintln!("{name} is rebooting");
    }
    Ok(())
}
