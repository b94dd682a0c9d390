// System endpoints
//
// Router identity, health metrics and reboot.

use serde::de::IgnoredAny;
use serde_json::json;
use tracing::debug;

use crate::client::GlinetClient;
use crate::error::Error;
use crate::models::{RouterInfo, SystemStatusResponse};

impl GlinetClient {
    /// Static router identity (factory MAC, model, firmware).
    ///
    /// `system.get_info`
    pub async fn router_info(&self) -> Result<RouterInfo, Error> {
        debug!("fetching router info");
        self.call("system", "get_info", json!({})).await
    }

    /// Uptime, load average and CPU temperature.
    ///
    /// `system.get_status`
    pub async fn system_status(&self) -> Result<SystemStatusResponse, Error> {
        self.call("system", "get_status", json!({})).await
    }

    /// Reboot the router immediately.
    ///
    /// `system.reboot` with `{"delay": 0}`
    pub async fn reboot(&self) -> Result<(), Error> {
        debug!("requesting reboot");
        let _: IgnoredAny = self.call("system", "reboot", json!({ "delay": 0 })).await?;
        Ok(())
    }
}
