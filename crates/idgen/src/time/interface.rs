use core::time::Duration;
use std::sync::Arc;

/// Base epoch: Monday, September 13, 2010 12:00:00 UTC
///
/// Subtracted from wall-clock time before packing so the timestamp field
/// covers several centuries with the default layout.
pub const BASE_EPOCH: Duration = Duration::from_millis(1_284_379_200_000);

/// [`BASE_EPOCH`] in milliseconds since the Unix epoch.
pub const BASE_EPOCH_MILLIS: i64 = BASE_EPOCH.as_millis() as i64;

/// A trait for wall-clock time sources.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests. Timestamps are **milliseconds since the Unix
/// epoch** and may go backwards; the generator deals with that.
///
/// # Example
///
/// ```
/// use idgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1_700_000_000_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_700_000_000_000);
/// ```
pub trait TimeSource {
    /// Returns the current wall-clock time in milliseconds since the Unix
    /// epoch.
    fn current_millis(&self) -> i64;

    /// Blocks the calling thread for `duration`.
    ///
    /// Used for the startup delay and for waiting out small clock
    /// regressions. Mock clocks override this to advance simulated time.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
