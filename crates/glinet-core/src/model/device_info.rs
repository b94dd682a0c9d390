// ── Router identity and device-info records ──
//
// Everything a consumer needs to describe the router (and its WAN
// interfaces) as devices in some registry, built once and validated.

use serde::{Deserialize, Serialize};
use url::Url;

use super::mac::{MacAddress, derive_mac};
use super::multiwan::interface_label;
use crate::error::CoreError;

/// Namespace for identifiers issued by this crate.
pub const DOMAIN: &str = "glinet";
pub const MANUFACTURER: &str = "GL-iNet";
const FALLBACK_MODEL: &str = "GL-iNet Router";

/// Static identity reported by the router during setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterIdentity {
    pub factory_mac: MacAddress,
    pub model: String,
    pub firmware_version: Option<String>,
}

impl RouterIdentity {
    /// Upper-cased model, e.g. `MT3000`.
    pub fn model(&self) -> String {
        self.model.to_uppercase()
    }

    /// Display name, e.g. `GL-iNet MT3000`.
    pub fn name(&self) -> String {
        format!("{MANUFACTURER} {}", self.model())
    }
}

/// How a device is physically identified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connection {
    Mac(MacAddress),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(namespace, id)` pairs.
    pub identifiers: Vec<(String, String)>,
    pub connections: Vec<Connection>,
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub configuration_url: Option<Url>,
    pub sw_version: Option<String>,
    /// Identifier of the parent device, for child records.
    pub via_device: Option<(String, String)>,
}

impl DeviceInfo {
    /// Record for the router itself. `unique_id` overrides the factory MAC
    /// as identifier. The router answers on its factory MAC and the next
    /// one up, so both are listed as connections.
    pub fn for_router(
        identity: &RouterIdentity,
        unique_id: Option<&str>,
        url: &Url,
    ) -> Result<Self, CoreError> {
        if url.host_str().is_none_or(str::is_empty) {
            return Err(CoreError::Validation {
                message: format!("router URL has no host: {url}"),
            });
        }
        let factory = derive_mac(identity.factory_mac.as_str(), 0)?;
        let lan = factory.offset(1)?;

        let model = if identity.model.trim().is_empty() {
            FALLBACK_MODEL.to_owned()
        } else {
            identity.model()
        };

        Ok(Self {
            identifiers: vec![(DOMAIN.into(), parent_id(identity, unique_id))],
            connections: vec![Connection::Mac(factory), Connection::Mac(lan)],
            name: identity.name(),
            model,
            manufacturer: MANUFACTURER.into(),
            configuration_url: Some(url.clone()),
            sw_version: identity.firmware_version.clone(),
            via_device: None,
        })
    }

    /// Child record for one WAN interface, attached to the router record.
    pub fn for_interface(
        identity: &RouterIdentity,
        unique_id: Option<&str>,
        iface_name: &str,
    ) -> Self {
        let parent = parent_id(identity, unique_id);
        let label = interface_label(iface_name);
        Self {
            identifiers: vec![(DOMAIN.into(), format!("{parent}_iface_{iface_name}"))],
            connections: Vec::new(),
            name: format!("{} {label}", identity.name()),
            model: label.to_owned(),
            manufacturer: MANUFACTURER.into(),
            configuration_url: None,
            sw_version: None,
            via_device: Some((DOMAIN.into(), parent)),
        }
    }
}

fn parent_id(identity: &RouterIdentity, unique_id: Option<&str>) -> String {
    unique_id
        .filter(|id| !id.is_empty())
        .map_or_else(|| identity.factory_mac.to_string(), str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn identity() -> RouterIdentity {
        RouterIdentity {
            factory_mac: MacAddress::new("94:83:C4:00:00:FF"),
            model: "mt3000".into(),
            firmware_version: Some("4.5.0".into()),
        }
    }

    fn url() -> Url {
        Url::parse("http://192.168.8.1").unwrap()
    }

    #[test]
    fn router_record() {
        let info = DeviceInfo::for_router(&identity(), None, &url()).unwrap();
        assert_eq!(info.identifiers, vec![("glinet".into(), "94:83:c4:00:00:ff".into())]);
        assert_eq!(
            info.connections,
            vec![
                Connection::Mac(MacAddress::new("94:83:c4:00:00:ff")),
                Connection::Mac(MacAddress::new("94:83:c4:00:01:00")),
            ]
        );
        assert_eq!(info.name, "GL-iNet MT3000");
        assert_eq!(info.model, "MT3000");
        assert_eq!(info.manufacturer, "GL-iNet");
        assert_eq!(info.sw_version.as_deref(), Some("4.5.0"));
    }

    #[test]
    fn unique_id_overrides_mac() {
        let info = DeviceInfo::for_router(&identity(), Some("entry-1"), &url()).unwrap();
        assert_eq!(info.identifiers[0].1, "entry-1");
    }

    #[test]
    fn blank_model_falls_back() {
        let mut id = identity();
        id.model = String::new();
        let info = DeviceInfo::for_router(&id, None, &url()).unwrap();
        assert_eq!(info.model, "GL-iNet Router");
    }

    #[test]
    fn invalid_factory_mac_is_rejected() {
        let mut id = identity();
        id.factory_mac = MacAddress::new("unknown");
        assert!(matches!(
            DeviceInfo::for_router(&id, None, &url()),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn interface_record_links_to_router() {
        let info = DeviceInfo::for_interface(&identity(), None, "modem_0001");
        assert_eq!(info.name, "GL-iNet MT3000 Cellular");
        assert_eq!(info.identifiers[0].1, "94:83:c4:00:00:ff_iface_modem_0001");
        assert_eq!(
            info.via_device,
            Some(("glinet".into(), "94:83:c4:00:00:ff".into()))
        );
    }
}
