use core::fmt;

use crate::InvalidIdError;

/// A 63-bit Snowflake-style identifier.
///
/// Stored as an `i64` whose top bit is always clear, so the value is never
/// negative and orders the same way as signed or unsigned integers. The field
/// boundaries depend on the [`IdLayout`] of the worker that issued it; use
/// [`IdLayout::decompose`] to read them back.
///
/// ```text
///  Bit Index:  63           62             S+N  S+N-1       S  S-1            0
///              +--------------+----------------+-------------+----------------+
///  Field:      | reserved (1) | timestamp      | node ID (N) | sequence (S)   |
///              +--------------+----------------+-------------+----------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB --------->|
/// ```
///
/// [`IdLayout`]: crate::IdLayout
/// [`IdLayout::decompose`]: crate::IdLayout::decompose
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: i64,
}

impl SnowflakeId {
    /// Mask that clears bit 63.
    pub const FIRST_BIT_MASK: i64 = i64::MAX;

    /// Wraps a raw value, clearing bit 63.
    pub const fn from_raw(raw: i64) -> Self {
        Self {
            id: raw & Self::FIRST_BIT_MASK,
        }
    }

    /// Returns the packed integer.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Returns the ID as a zero-padded 19-digit string, which sorts
    /// lexicographically in the same order as the numeric value.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl TryFrom<i64> for SnowflakeId {
    type Error = InvalidIdError;

    /// Accepts `raw` only if bit 63 is already clear.
    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw < 0 {
            return Err(InvalidIdError::Negative { raw });
        }
        Ok(Self { id: raw })
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <i64 as serde::Deserialize>::deserialize(d)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
