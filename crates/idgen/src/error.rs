//! Error types for worker construction and ID generation.
//!
//! Configuration problems surface from the constructors as [`ConfigError`].
//! Clock faults that cannot be absorbed locally surface from
//! [`IdWorker::next_id`] as [`ClockError`]. Small clock regressions and
//! sequence exhaustion are handled inside the generator and never show up
//! here.
//!
//! [`IdWorker::next_id`]: crate::IdWorker::next_id

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A worker was configured with an out-of-range parameter.
///
/// Not retryable without changing the parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The sequence field is narrower than the allowed minimum.
    #[error("sequence bits {bits} is below the minimum of {min}")]
    SequenceBitsTooSmall { bits: u32, min: u32 },

    /// The node ID field is narrower than the allowed minimum.
    ///
    /// A width of `0` selects the default rather than failing, so with a
    /// minimum of one bit this cannot be returned today. It only fires if
    /// [`MIN_NODE_ID_BITS`] is raised.
    ///
    /// [`MIN_NODE_ID_BITS`]: crate::MIN_NODE_ID_BITS
    #[error("node id bits {bits} is below the minimum of {min}")]
    NodeIdBitsTooSmall { bits: u32, min: u32 },

    /// The sequence and node ID fields together leave too few timestamp bits.
    #[error("sequence bits {sequence_bits} + node id bits {node_id_bits} exceeds {max}")]
    LayoutTooWide {
        sequence_bits: u32,
        node_id_bits: u32,
        max: u32,
    },

    /// The node ID does not fit in the node ID field.
    #[error("node id {node_id} is outside the allowed range 0..={max}")]
    NodeIdOutOfRange { node_id: i64, max: i64 },
}

/// The clock is in a state the generator refuses to issue IDs from.
///
/// Callers should treat this as fatal to the ID stream until the clock is
/// corrected rather than retrying in a loop.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ClockError {
    /// The clock moved backwards by more than the configured tolerance.
    #[error("clock moved backwards by {behind_ms}ms (tolerance is {tolerance_ms}ms)")]
    MovedBackwards { behind_ms: i64, tolerance_ms: i64 },

    /// The clock was still behind the last issued timestamp after waiting
    /// out a small regression.
    #[error("clock still {behind_ms}ms behind the last issued timestamp after waiting")]
    StillBehind { behind_ms: i64 },

    /// The clock reads earlier than the base epoch.
    #[error("clock reads {now_ms}ms since the unix epoch, which is before the base epoch")]
    BeforeEpoch { now_ms: i64 },

    /// The elapsed time no longer fits in the timestamp field.
    #[error("timestamp {timestamp} exceeds the layout maximum of {max}")]
    TimestampOverflow { timestamp: i64, max: i64 },
}

/// A raw integer could not be taken as a [`SnowflakeId`].
///
/// [`SnowflakeId`]: crate::SnowflakeId
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum InvalidIdError {
    /// Bit 63 is set.
    #[error("raw id {raw} is negative: bit 63 must be clear")]
    Negative { raw: i64 },
}

/// All error variants the generator can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Clock(#[from] ClockError),

    /// A thread panicked while holding the worker's state lock.
    ///
    /// Only possible with the std mutex; `parking_lot` locks do not poison.
    #[cfg(not(feature = "parking-lot"))]
    #[error("worker state lock was poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
