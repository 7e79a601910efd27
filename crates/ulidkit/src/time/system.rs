use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// Reads the system wall clock on every call.
///
/// A clock set before the Unix epoch reads as `0`.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
