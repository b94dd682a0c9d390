// ── System metrics ──

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A new boot time only replaces the previous one when it moved by more
/// than this. Uptime and wall clock are sampled at slightly different
/// moments, so consecutive polls jitter by a second or two.
pub const BOOT_TIME_TOLERANCE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub cpu_temperature: Option<f64>,
    /// 1, 5 and 15 minute load averages.
    pub load_average: [Option<f64>; 3],
    pub uptime_secs: Option<u64>,
    /// Smoothed boot timestamp derived from `uptime_secs`.
    pub boot_time: Option<DateTime<Utc>>,
}

/// Derive the boot timestamp for `uptime_secs` observed at `now`, keeping
/// `previous` unless the two differ by more than [`BOOT_TIME_TOLERANCE`].
pub fn smooth_boot_time(
    now: DateTime<Utc>,
    uptime_secs: u64,
    previous: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    let boot = i64::try_from(uptime_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|uptime| now.checked_sub_signed(uptime))
        .unwrap_or(now);
    match previous {
        Some(prev) => {
            let drift = if boot > prev { boot - prev } else { prev - boot };
            if drift.to_std().unwrap_or_default() > BOOT_TIME_TOLERANCE {
                boot
            } else {
                prev
            }
        }
        None => boot,
    }
}
