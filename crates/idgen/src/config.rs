//! Worker configuration.
//!
//! A [`WorkerConfig`] is fixed at construction. The field widths define the
//! bit layout of every ID the worker emits, so two workers that must produce
//! comparable IDs need the same widths. The regression tolerance and the
//! startup delay are operational knobs: the defaults cover routine NTP
//! corrections and a crash-restart within the same millisecond, and can be
//! tuned per deployment.

use crate::{ConfigError, IdLayout};
use core::time::Duration;

/// Sequence field width used when `0` is passed.
pub const DEFAULT_SEQUENCE_BITS: u32 = 14;

/// Node ID field width used when `0` is passed.
pub const DEFAULT_NODE_ID_BITS: u32 = 5;

/// Narrowest allowed sequence field (4096 IDs per millisecond).
pub const MIN_SEQUENCE_BITS: u32 = 12;

/// Narrowest allowed node ID field.
pub const MIN_NODE_ID_BITS: u32 = 1;

/// Widest allowed sequence + node ID combination. Leaves at least 43 bits of
/// timestamp.
pub const MAX_LAYOUT_BITS: u32 = 20;

/// Largest backward clock step absorbed by sleeping instead of failing.
pub const DEFAULT_MAX_BACKWARD: Duration = Duration::from_millis(200);

/// Pause before a freshly constructed worker issues its first ID.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(1);

/// Construction parameters for an [`IdWorker`].
///
/// `sequence_bits == 0` and `node_id_bits == 0` mean "use the default"
/// ([`DEFAULT_SEQUENCE_BITS`] and [`DEFAULT_NODE_ID_BITS`]). Zero is never a
/// legal explicit width.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use idgen::WorkerConfig;
///
/// let config = WorkerConfig::new(3, 0, 0).with_max_backward(Duration::from_millis(50));
/// let layout = config.validate().unwrap();
/// assert_eq!(layout.sequence_bits(), 14);
/// assert_eq!(layout.max_node_id(), 31);
/// ```
///
/// [`IdWorker`]: crate::IdWorker
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerConfig {
    /// Operator-assigned ID of this generator, unique among live workers.
    pub node_id: i64,
    /// Width of the per-millisecond sequence field.
    pub sequence_bits: u32,
    /// Width of the node ID field.
    pub node_id_bits: u32,
    /// Backward clock steps up to this size are waited out.
    pub max_backward: Duration,
    /// One-time pause in the constructor.
    pub startup_delay: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            node_id: 0,
            sequence_bits: DEFAULT_SEQUENCE_BITS,
            node_id_bits: DEFAULT_NODE_ID_BITS,
            max_backward: DEFAULT_MAX_BACKWARD,
            startup_delay: DEFAULT_STARTUP_DELAY,
        }
    }
}

impl WorkerConfig {
    /// Creates a configuration with the default tolerance and startup delay.
    pub const fn new(node_id: i64, sequence_bits: u32, node_id_bits: u32) -> Self {
        Self {
            node_id,
            sequence_bits,
            node_id_bits,
            max_backward: DEFAULT_MAX_BACKWARD,
            startup_delay: DEFAULT_STARTUP_DELAY,
        }
    }

    #[must_use]
    pub const fn with_node_id(mut self, node_id: i64) -> Self {
        self.node_id = node_id;
        self
    }

    #[must_use]
    pub const fn with_sequence_bits(mut self, bits: u32) -> Self {
        self.sequence_bits = bits;
        self
    }

    #[must_use]
    pub const fn with_node_id_bits(mut self, bits: u32) -> Self {
        self.node_id_bits = bits;
        self
    }

    #[must_use]
    pub const fn with_max_backward(mut self, max_backward: Duration) -> Self {
        self.max_backward = max_backward;
        self
    }

    #[must_use]
    pub const fn with_startup_delay(mut self, startup_delay: Duration) -> Self {
        self.startup_delay = startup_delay;
        self
    }

    /// The regression tolerance in whole milliseconds.
    pub(crate) fn max_backward_millis(&self) -> i64 {
        i64::try_from(self.max_backward.as_millis()).unwrap_or(i64::MAX)
    }

    /// Resolves default widths and checks every constraint.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: field widths are checked
    /// before the node ID range.
    pub fn validate(&self) -> Result<IdLayout, ConfigError> {
        let layout = IdLayout::new(self.sequence_bits, self.node_id_bits)?;
        let max = layout.max_node_id();
        if !(0..=max).contains(&self.node_id) {
            return Err(ConfigError::NodeIdOutOfRange {
                node_id: self.node_id,
                max,
            });
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_widths_resolve_to_defaults() {
        let layout = WorkerConfig::new(0, 0, 0).validate().unwrap();
        assert_eq!(layout.sequence_bits(), DEFAULT_SEQUENCE_BITS);
        assert_eq!(layout.node_id_bits(), DEFAULT_NODE_ID_BITS);
        assert_eq!(layout.max_node_id(), 31);
    }

    #[test]
    fn explicit_zero_node_bits_is_the_default_not_an_error() {
        let layout = WorkerConfig::new(31, 14, 0).validate().unwrap();
        assert_eq!(layout.node_id_bits(), 5);
    }

    #[test]
    fn rejects_narrow_sequence() {
        assert_eq!(
            WorkerConfig::new(0, 11, 5).validate(),
            Err(ConfigError::SequenceBitsTooSmall { bits: 11, min: 12 })
        );
    }

    #[test]
    fn rejects_layout_wider_than_twenty_bits() {
        assert_eq!(
            WorkerConfig::new(0, 16, 5).validate(),
            Err(ConfigError::LayoutTooWide {
                sequence_bits: 16,
                node_id_bits: 5,
                max: 20,
            })
        );
        assert!(WorkerConfig::new(0, 15, 5).validate().is_ok());
    }

    #[test]
    fn rejects_node_id_one_past_max() {
        assert_eq!(
            WorkerConfig::new(32, 14, 5).validate(),
            Err(ConfigError::NodeIdOutOfRange {
                node_id: 32,
                max: 31,
            })
        );
        assert!(WorkerConfig::new(31, 14, 5).validate().is_ok());
    }

    #[test]
    fn rejects_negative_node_id() {
        assert!(matches!(
            WorkerConfig::new(-1, 0, 0).validate(),
            Err(ConfigError::NodeIdOutOfRange { node_id: -1, .. })
        ));
    }

    #[test]
    fn huge_widths_do_not_overflow() {
        assert!(matches!(
            WorkerConfig::new(0, u32::MAX, u32::MAX).validate(),
            Err(ConfigError::LayoutTooWide { .. })
        ));
    }

    #[test]
    fn builder_overrides_operational_knobs() {
        let config = WorkerConfig::default()
            .with_node_id(7)
            .with_sequence_bits(12)
            .with_node_id_bits(8)
            .with_max_backward(Duration::from_millis(10))
            .with_startup_delay(Duration::ZERO);
        assert_eq!(config.node_id, 7);
        assert_eq!(config.max_backward_millis(), 10);
        assert_eq!(config.startup_delay, Duration::ZERO);
        assert_eq!(config.validate().unwrap().max_node_id(), 255);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_partial_config_with_defaults() {
        let config: WorkerConfig = serde_json::from_str(r#"{"node_id": 4}"#).unwrap();
        assert_eq!(config, WorkerConfig::default().with_node_id(4));

        let json = serde_json::to_string(&config).unwrap();
        let back: WorkerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
