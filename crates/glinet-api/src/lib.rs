// glinet-api: Async Rust client for the GL-iNet router JSON-RPC API

pub mod api;
pub mod auth;
pub mod client;
pub mod clients;
pub mod error;
pub mod models;
pub mod multiwan;
pub mod system;
pub mod transport;
pub mod vpn;
pub mod wifi;

pub use api::RouterApi;
pub use client::{API_PATH, GlinetClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
