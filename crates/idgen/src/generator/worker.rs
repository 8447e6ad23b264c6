use core::time::Duration;
use std::sync::Arc;

use tracing::instrument;

use super::{Mutex, status::Tick};
use crate::{
    BASE_EPOCH_MILLIS, ClockError, ConfigError, IdGenerator, IdLayout, IdParts, Result,
    SnowflakeId, SystemClock, TimeSource, WorkerConfig,
};

/// Mutable generation state, only touched under the worker's lock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct WorkerState {
    /// Last millisecond (since the base epoch) an ID was issued for.
    pub(super) last_ms: i64,
    /// Next sequence value to hand out within `last_ms`. Always within the
    /// sequence mask; zero inside `last_ms` means the millisecond is used up.
    pub(super) sequence: i64,
}

/// A lock-based Snowflake ID generator for one node.
///
/// The generation state sits behind a single mutex, so any number of threads
/// may call [`IdWorker::next_id`] on a shared worker. Cloning a worker shares
/// that state; clones behave as one generator.
///
/// ## Guarantees
/// - IDs never repeat while the worker is alive
/// - IDs from one worker strictly increase, given a non-decreasing clock
/// - Bit 63 is always clear
///
/// ## Blocking
/// - At most `2^sequence_bits` IDs per millisecond: past that, callers spin
///   until the clock ticks over
/// - Backward clock steps within [`WorkerConfig::max_backward`] are slept
///   through; larger ones fail with [`ClockError::MovedBackwards`]
/// - The constructor pauses for [`WorkerConfig::startup_delay`]
///
/// # Example
/// ```
/// use idgen::IdWorker;
///
/// let worker = IdWorker::new(1, 14, 5).unwrap();
/// let a = worker.next_id().unwrap();
/// let b = worker.next_id().unwrap();
/// assert!(b > a);
/// assert_eq!(worker.decompose(a).node_id, 1);
/// ```
#[derive(Clone, Debug)]
pub struct IdWorker<T = SystemClock>
where
    T: TimeSource,
{
    config: WorkerConfig,
    layout: IdLayout,
    node_mask: i64,
    #[cfg(feature = "cache-padded")]
    pub(super) state: Arc<crossbeam_utils::CachePadded<Mutex<WorkerState>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(super) state: Arc<Mutex<WorkerState>>,
    time: T,
}

impl IdWorker<SystemClock> {
    /// Creates a worker on the system clock.
    ///
    /// `sequence_bits == 0` and `node_id_bits == 0` select the defaults (14
    /// and 5). Blocks for the default startup delay before returning.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any parameter is out of range.
    pub fn new(node_id: i64, sequence_bits: u32, node_id_bits: u32) -> Result<Self, ConfigError> {
        Self::with_config(WorkerConfig::new(node_id, sequence_bits, node_id_bits))
    }

    /// Creates a worker on the system clock from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any parameter is out of range.
    pub fn with_config(config: WorkerConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_clock(config, SystemClock)
    }
}

impl<T> IdWorker<T>
where
    T: TimeSource,
{
    /// Creates a worker reading time from `time`.
    ///
    /// Sleeps for `config.startup_delay` (through `time`) before returning.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any parameter is out of range.
    pub fn with_config_and_clock(config: WorkerConfig, time: T) -> Result<Self, ConfigError> {
        let worker = Self::from_components(config, 0, 0, time)?;

        // A process restarted inside the millisecond it crashed in starts
        // with fresh state and would reissue that millisecond's sequences.
        worker.time.sleep(config.startup_delay);

        tracing::info!(
            node_id = config.node_id,
            sequence_bits = worker.layout.sequence_bits(),
            node_id_bits = worker.layout.node_id_bits(),
            "id worker ready"
        );
        Ok(worker)
    }

    /// Creates a worker from explicit state, without the startup delay.
    ///
    /// Useful for restoring a generator or for starting it at a known
    /// point. `last_ms` is in milliseconds since the base epoch and
    /// `sequence` is the next value to hand out within it (masked to the
    /// sequence field).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any parameter is out of range.
    pub fn from_components(
        config: WorkerConfig,
        last_ms: i64,
        sequence: i64,
        time: T,
    ) -> Result<Self, ConfigError> {
        let layout = config.validate()?;
        let state = WorkerState {
            last_ms,
            sequence: sequence & layout.sequence_mask(),
        };
        Ok(Self {
            config,
            layout,
            node_mask: layout.node_mask(config.node_id),
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(state))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(state)),
            time,
        })
    }

    /// Generates the next ID.
    ///
    /// Holds the worker's lock for the whole call, including any wait for
    /// the next millisecond or for a small clock regression to pass.
    ///
    /// # Errors
    /// - [`ClockError::MovedBackwards`] if the clock stepped back further
    ///   than the configured tolerance
    /// - [`ClockError::StillBehind`] if it was still behind after waiting
    /// - [`ClockError::BeforeEpoch`] if it reads earlier than the base epoch
    /// - [`ClockError::TimestampOverflow`] if the timestamp field is full
    /// - [`Error::LockPoisoned`] if another caller panicked under the lock
    ///   (std mutex only)
    ///
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[instrument(level = "trace", skip(self), fields(node_id = self.config.node_id))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let mask = self.layout.sequence_mask();
        let mut now = self.current_timestamp()?;
        let mut waited = false;
        loop {
            match Tick::classify(now, state.last_ms, state.sequence) {
                Tick::NewMillisecond => {
                    state.last_ms = now;
                    state.sequence = 0;
                    break;
                }
                Tick::SameMillisecond => break,
                Tick::SequenceExhausted => {
                    now = self.wait_past(state.last_ms)?;
                    state.last_ms = now;
                    state.sequence = 0;
                    break;
                }
                Tick::ClockBehind { behind_ms } if waited => {
                    tracing::error!(behind_ms, "clock still behind after waiting");
                    return Err(ClockError::StillBehind { behind_ms }.into());
                }
                Tick::ClockBehind { behind_ms } => {
                    now = self.cold_clock_behind(behind_ms)?;
                    waited = true;
                }
            }
        }

        let raw = (now << self.layout.timestamp_shift()) | self.node_mask | state.sequence;
        state.sequence = (state.sequence + 1) & mask;
        Ok(SnowflakeId::from_raw(raw))
    }

    /// Generates the next ID, panicking on any error.
    ///
    /// # Panics
    ///
    /// Panics if [`IdWorker::next_id`] fails.
    pub fn next_id_must(&self) -> SnowflakeId {
        IdGenerator::next_id_must(self)
    }

    /// Largest node ID this worker's layout can hold.
    pub const fn max_node_id(&self) -> i64 {
        self.layout.max_node_id()
    }

    pub const fn node_id(&self) -> i64 {
        self.config.node_id
    }

    pub const fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub const fn layout(&self) -> &IdLayout {
        &self.layout
    }

    /// Splits an ID issued under this worker's layout into its fields.
    pub const fn decompose(&self, id: SnowflakeId) -> IdParts {
        self.layout.decompose(id)
    }

    /// Reads the clock as milliseconds since the base epoch.
    fn current_timestamp(&self) -> Result<i64, ClockError> {
        let now_ms = self.time.current_millis();
        let timestamp = now_ms.saturating_sub(BASE_EPOCH_MILLIS);
        if timestamp < 0 {
            return Err(ClockError::BeforeEpoch { now_ms });
        }
        let max = self.layout.max_timestamp();
        if timestamp > max {
            return Err(ClockError::TimestampOverflow { timestamp, max });
        }
        Ok(timestamp)
    }

    /// Spins until the clock passes `last_ms`.
    ///
    /// Small backward steps seen while spinning are spun through; a step
    /// past the tolerance aborts the wait.
    fn wait_past(&self, last_ms: i64) -> Result<i64, ClockError> {
        tracing::trace!(last_ms, "sequence exhausted, waiting for the next millisecond");
        let tolerance_ms = self.config.max_backward_millis();
        loop {
            let now = self.current_timestamp()?;
            if now > last_ms {
                return Ok(now);
            }
            let behind_ms = last_ms - now;
            if behind_ms > tolerance_ms {
                tracing::error!(
                    behind_ms,
                    tolerance_ms,
                    "clock moved backwards beyond tolerance while waiting for the next millisecond"
                );
                return Err(ClockError::MovedBackwards {
                    behind_ms,
                    tolerance_ms,
                });
            }
            core::hint::spin_loop();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, behind_ms: i64) -> Result<i64> {
        let tolerance_ms = self.config.max_backward_millis();
        if behind_ms > tolerance_ms {
            tracing::error!(behind_ms, tolerance_ms, "clock moved backwards beyond tolerance");
            return Err(ClockError::MovedBackwards {
                behind_ms,
                tolerance_ms,
            }
            .into());
        }

        tracing::warn!(behind_ms, "clock moved backwards, waiting for it to catch up");
        self.time.sleep(Duration::from_millis(behind_ms.unsigned_abs()));
        Ok(self.current_timestamp()?)
    }
}

impl<T> IdGenerator for IdWorker<T>
where
    T: TimeSource,
{
    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }

    fn max_node_id(&self) -> i64 {
        self.max_node_id()
    }
}
