// glinet-core: Session, poll loop and cached state between glinet-api and consumers.

pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod router;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{RouterConfig, TlsVerification};
pub use error::{CoreError, FailureKind};
pub use router::{Router, RouterState};
pub use session::RouterSession;
pub use store::DataStore;
pub use stream::EntityStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Tracked records
    ConnectedDevice, InterfaceType, MacAddress, WifiInterface, WireGuardClient,
    // Router-wide state
    MultiWanMode, MultiWanState, SystemStatus, TailscaleStatus, WanInterface,
    // Identity
    DeviceInfo, RouterIdentity,
};
