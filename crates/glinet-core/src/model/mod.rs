// ── Domain model ──
//
// Plain records cached by the `DataStore`. Conversion from wire types
// lives in `crate::convert`.

pub mod device;
pub mod device_info;
pub mod mac;
pub mod multiwan;
pub mod system;
pub mod tailscale;
pub mod wifi;
pub mod wireguard;

pub use device::{ClientReport, ConnectedDevice, InterfaceType};
pub use device_info::{Connection, DeviceInfo, RouterIdentity};
pub use mac::{MacAddress, derive_mac};
pub use multiwan::{
    CellInfo, ModemInfo, ModemSignal, MultiWanMode, MultiWanState, SimInfo, WanInterface,
    interface_label, select_cell,
};
pub use system::{SystemStatus, smooth_boot_time};
pub use tailscale::TailscaleStatus;
pub use wifi::WifiInterface;
pub use wireguard::{WireGuardActivity, WireGuardClient};
