// Client endpoints

use serde_json::json;

use crate::client::GlinetClient;
use crate::error::Error;
use crate::models::{ClientEntry, ClientListResponse};

impl GlinetClient {
    /// Every client the router currently knows about, online or not.
    ///
    /// `clients.get_list`
    pub async fn connected_clients(&self) -> Result<Vec<ClientEntry>, Error> {
        let resp: ClientListResponse = self.call("clients", "get_list", json!({})).await?;
        Ok(resp.clients)
    }
}
