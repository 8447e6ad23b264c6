use crate::TimeSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// The host's wall clock.
///
/// Reads [`SystemTime::now`] on every call. Unlike a monotonic timer this
/// follows NTP steps and manual adjustments, which is why the generator
/// tolerates small backward jumps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => i64::try_from(since.as_millis()).unwrap_or(i64::MAX),
            Err(before) => {
                i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |millis| -millis)
            }
        }
    }
}
