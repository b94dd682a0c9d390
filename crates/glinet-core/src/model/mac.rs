// ── MAC addresses ──
//
// Normalized lowercase colon-separated form, plus the 48-bit arithmetic
// the router's interface MACs are derived with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const MAC_MASK: u64 = 0xffff_ffff_ffff;

/// A MAC address, normalized on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        match parse_bits(raw) {
            Some(bits) => Self::from_bits(bits),
            None => Self(raw.to_lowercase().replace('-', ":")),
        }
    }

    /// Build from the low 48 bits of `bits`.
    pub fn from_bits(bits: u64) -> Self {
        let bytes = (bits & MAC_MASK).to_be_bytes();
        let octets: Vec<String> = bytes[2..].iter().map(|b| format!("{b:02x}")).collect();
        Self(octets.join(":"))
    }

    /// The address as a 48-bit integer, or `None` if it is not valid hex.
    pub fn to_bits(&self) -> Option<u64> {
        parse_bits(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name used for a device the router reports no usable name for.
    pub fn fallback_name(&self) -> String {
        self.0.replace(':', "_")
    }

    /// The address `delta` positions away, wrapping within 48 bits.
    pub fn offset(&self, delta: i64) -> Result<Self, CoreError> {
        let bits = self.to_bits().ok_or_else(|| CoreError::Validation {
            message: format!("not a MAC address: {:?}", self.0),
        })?;
        let modulus = i128::from(MAC_MASK) + 1;
        let shifted = (i128::from(bits) + i128::from(delta)).rem_euclid(modulus);
        let shifted = u64::try_from(shifted)
            .map_err(|e| CoreError::Internal(format!("MAC arithmetic overflow: {e}")))?;
        Ok(Self::from_bits(shifted))
    }
}

/// Derive the MAC `delta` positions from `mac`, e.g. the router's LAN
/// interface from its factory MAC. Wraps modulo 2^48.
pub fn derive_mac(mac: &str, delta: i64) -> Result<MacAddress, CoreError> {
    let bits = parse_bits(mac).ok_or_else(|| CoreError::Validation {
        message: format!("not a MAC address: {mac:?}"),
    })?;
    MacAddress::from_bits(bits).offset(delta)
}

fn parse_bits(raw: &str) -> Option<u64> {
    let hex: String = raw.chars().filter(|c| *c != ':' && *c != '-').collect();
    if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(&hex, 16).ok()
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
