// ── WiFi interfaces ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiInterface {
    /// Interface name, e.g. `wlan0`. Used as the key for commands.
    pub name: String,
    pub enabled: bool,
    pub ssid: String,
    pub guest: bool,
    pub hidden: bool,
    pub encryption: Option<String>,
    /// Radio band as reported, e.g. `2g` / `5g`.
    pub band: Option<String>,
}
