use crate::{
    BASE_EPOCH_MILLIS, ConfigError, DEFAULT_NODE_ID_BITS, DEFAULT_SEQUENCE_BITS, MAX_LAYOUT_BITS,
    MIN_NODE_ID_BITS, MIN_SEQUENCE_BITS, SnowflakeId,
};

/// Total bits available to the three fields. Bit 63 is reserved.
const USABLE_BITS: u32 = 63;

/// A validated bit layout: sequence in the low bits, node ID above it,
/// timestamp (milliseconds since [`BASE_EPOCH`]) above that, bit 63 clear.
///
/// The default layout is 14 bits of sequence, 5 bits of node ID and 44 bits
/// of timestamp.
///
/// ```text
///  Bit Index:  63           62             19 18          14 13             0
///              +--------------+----------------+-------------+---------------+
///  Field:      | reserved (1) | timestamp (44) | node ID (5) | sequence (14) |
///              +--------------+----------------+-------------+---------------+
/// ```
///
/// # Example
///
/// ```
/// use idgen::IdLayout;
///
/// let layout = IdLayout::default();
/// let id = layout.compose(1000, 2, 1);
/// let parts = layout.decompose(id);
/// assert_eq!((parts.timestamp, parts.node_id, parts.sequence), (1000, 2, 1));
/// ```
///
/// [`BASE_EPOCH`]: crate::BASE_EPOCH
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdLayout {
    sequence_bits: u32,
    node_id_bits: u32,
}

impl Default for IdLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl IdLayout {
    /// 14 bits of sequence and 5 bits of node ID.
    pub const DEFAULT: Self = Self {
        sequence_bits: DEFAULT_SEQUENCE_BITS,
        node_id_bits: DEFAULT_NODE_ID_BITS,
    };

    /// Builds a layout, substituting the defaults for zero widths.
    ///
    /// # Errors
    ///
    /// Fails if the sequence field is narrower than [`MIN_SEQUENCE_BITS`],
    /// the node field is narrower than [`MIN_NODE_ID_BITS`], or the two
    /// together exceed [`MAX_LAYOUT_BITS`].
    ///
    /// [`MIN_SEQUENCE_BITS`]: crate::MIN_SEQUENCE_BITS
    /// [`MIN_NODE_ID_BITS`]: crate::MIN_NODE_ID_BITS
    /// [`MAX_LAYOUT_BITS`]: crate::MAX_LAYOUT_BITS
    pub fn new(sequence_bits: u32, node_id_bits: u32) -> Result<Self, ConfigError> {
        let sequence_bits = if sequence_bits == 0 {
            DEFAULT_SEQUENCE_BITS
        } else {
            sequence_bits
        };
        let node_id_bits = if node_id_bits == 0 {
            DEFAULT_NODE_ID_BITS
        } else {
            node_id_bits
        };

        if sequence_bits < MIN_SEQUENCE_BITS {
            return Err(ConfigError::SequenceBitsTooSmall {
                bits: sequence_bits,
                min: MIN_SEQUENCE_BITS,
            });
        }
        // Unreachable while the minimum is one bit, as zero was replaced above.
        if node_id_bits < MIN_NODE_ID_BITS {
            return Err(ConfigError::NodeIdBitsTooSmall {
                bits: node_id_bits,
                min: MIN_NODE_ID_BITS,
            });
        }
        match sequence_bits.checked_add(node_id_bits) {
            Some(total) if total <= MAX_LAYOUT_BITS => Ok(Self {
                sequence_bits,
                node_id_bits,
            }),
            _ => Err(ConfigError::LayoutTooWide {
                sequence_bits,
                node_id_bits,
                max: MAX_LAYOUT_BITS,
            }),
        }
    }

    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits
    }

    pub const fn node_id_bits(&self) -> u32 {
        self.node_id_bits
    }

    /// Width of the timestamp field.
    pub const fn timestamp_bits(&self) -> u32 {
        USABLE_BITS - self.timestamp_shift()
    }

    /// Bitmask for the sequence field, also the largest sequence value.
    pub const fn sequence_mask(&self) -> i64 {
        (1 << self.sequence_bits) - 1
    }

    /// Number of bits to shift the node ID to its position.
    pub const fn node_id_shift(&self) -> u32 {
        self.sequence_bits
    }

    /// Number of bits to shift the timestamp to its position.
    pub const fn timestamp_shift(&self) -> u32 {
        self.sequence_bits + self.node_id_bits
    }

    /// Largest node ID the layout can hold.
    pub const fn max_node_id(&self) -> i64 {
        (1 << self.node_id_bits) - 1
    }

    /// Largest timestamp (milliseconds since the base epoch) the layout can
    /// hold.
    pub const fn max_timestamp(&self) -> i64 {
        (1 << self.timestamp_bits()) - 1
    }

    /// The node ID already shifted into place.
    pub const fn node_mask(&self, node_id: i64) -> i64 {
        (node_id & self.max_node_id()) << self.node_id_shift()
    }

    /// Packs the three fields into an ID. Out-of-range values are truncated
    /// to their field.
    pub const fn compose(&self, timestamp: i64, node_id: i64, sequence: i64) -> SnowflakeId {
        let timestamp = (timestamp & self.max_timestamp()) << self.timestamp_shift();
        let sequence = sequence & self.sequence_mask();
        SnowflakeId::from_raw(timestamp | self.node_mask(node_id) | sequence)
    }

    /// Splits an ID back into its fields.
    pub const fn decompose(&self, id: SnowflakeId) -> IdParts {
        let raw = id.to_raw();
        IdParts {
            timestamp: (raw >> self.timestamp_shift()) & self.max_timestamp(),
            node_id: (raw >> self.node_id_shift()) & self.max_node_id(),
            sequence: raw & self.sequence_mask(),
        }
    }
}

/// The fields of a decoded [`SnowflakeId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdParts {
    /// Milliseconds since the base epoch.
    pub timestamp: i64,
    pub node_id: i64,
    pub sequence: i64,
}

impl IdParts {
    /// The timestamp as milliseconds since the Unix epoch.
    pub const fn unix_millis(&self) -> i64 {
        self.timestamp + BASE_EPOCH_MILLIS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_documented_positions() {
        let layout = IdLayout::DEFAULT;
        assert_eq!(layout.sequence_mask(), 0x3fff);
        assert_eq!(layout.node_id_shift(), 14);
        assert_eq!(layout.timestamp_shift(), 19);
        assert_eq!(layout.timestamp_bits(), 44);
        assert_eq!(layout.max_node_id(), 31);
        assert_eq!(layout.node_mask(1), 1 << 14);
    }

    #[test]
    fn compose_places_fields() {
        let layout = IdLayout::DEFAULT;
        let id = layout.compose(3, 2, 1);
        assert_eq!(id.to_raw(), (3 << 19) | (2 << 14) | 1);
        assert_eq!(
            layout.decompose(id),
            IdParts {
                timestamp: 3,
                node_id: 2,
                sequence: 1,
            }
        );
    }

    #[test]
    fn full_fields_never_set_top_bit() {
        for (seq, node) in [(12, 1), (14, 5), (12, 8), (19, 1)] {
            let layout = IdLayout::new(seq, node).unwrap();
            let id = layout.compose(
                layout.max_timestamp(),
                layout.max_node_id(),
                layout.sequence_mask(),
            );
            assert_eq!(id.to_raw(), i64::MAX);
            let parts = layout.decompose(id);
            assert_eq!(parts.timestamp, layout.max_timestamp());
            assert_eq!(parts.node_id, layout.max_node_id());
            assert_eq!(parts.sequence, layout.sequence_mask());
        }
    }

    #[test]
    fn narrowest_timestamp_still_spans_centuries() {
        let layout = IdLayout::new(MIN_SEQUENCE_BITS, MAX_LAYOUT_BITS - MIN_SEQUENCE_BITS).unwrap();
        assert_eq!(layout.timestamp_bits(), 43);
        let years = layout.max_timestamp() / (1000 * 60 * 60 * 24 * 365);
        assert!(years > 250, "only {years} years of range");
    }

    #[test]
    fn every_node_width_from_zero_is_accepted() {
        assert_eq!(IdLayout::new(14, 0), Ok(IdLayout::DEFAULT));
        for bits in MIN_NODE_ID_BITS..=MAX_LAYOUT_BITS - MIN_SEQUENCE_BITS {
            let layout = IdLayout::new(MIN_SEQUENCE_BITS, bits).unwrap();
            assert_eq!(layout.node_id_bits(), bits);
        }
    }

    #[test]
    fn unix_millis_adds_the_base_epoch() {
        let parts = IdLayout::DEFAULT.decompose(IdLayout::DEFAULT.compose(5, 0, 0));
        assert_eq!(parts.unix_millis(), BASE_EPOCH_MILLIS + 5);
    }
}
