// WiFi endpoints
//
// The router groups interfaces under their radio; callers get a flat list
// with the radio's band copied onto each interface.

use serde::de::IgnoredAny;
use serde_json::json;
use tracing::debug;

use crate::client::GlinetClient;
use crate::error::Error;
use crate::models::{WifiConfigResponse, WifiIface};

impl GlinetClient {
    /// All configured WiFi interfaces.
    ///
    /// `wifi.get_config`
    pub async fn wifi_interfaces(&self) -> Result<Vec<WifiIface>, Error> {
        let resp: WifiConfigResponse = self.call("wifi", "get_config", json!({})).await?;
        Ok(resp
            .res
            .into_iter()
            .flat_map(|device| {
                let band = device.band;
                device.ifaces.into_iter().map(move |mut iface| {
                    if iface.band.is_none() {
                        iface.band.clone_from(&band);
                    }
                    iface
                })
            })
            .collect())
    }

    /// Enable or disable one interface by name.
    ///
    /// `wifi.set_config` with `{"iface_name": ..., "enabled": ...}`
    pub async fn set_wifi_enabled(&self, iface_name: &str, enabled: bool) -> Result<(), Error> {
        debug!(iface_name, enabled, "setting wifi interface state");
        let _: IgnoredAny = self
            .call(
                "wifi",
                "set_config",
                json!({ "iface_name": iface_name, "enabled": enabled }),
            )
            .await?;
        Ok(())
    }
}
