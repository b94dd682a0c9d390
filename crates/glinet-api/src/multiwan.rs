// Multi-WAN endpoint

use serde_json::json;

use crate::client::GlinetClient;
use crate::error::Error;
use crate::models::MultiWanStatus;

impl GlinetClient {
    /// Mode and per-interface reachability of every WAN uplink.
    ///
    /// `kmwan.get_status`
    pub async fn multiwan_state(&self) -> Result<MultiWanStatus, Error> {
        self.call("kmwan", "get_status", json!({})).await
    }
}
