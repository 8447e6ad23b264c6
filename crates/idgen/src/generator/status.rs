use core::cmp::Ordering;

/// How a single call relates to the generator's last issued millisecond.
///
/// Every call is classified afresh from `last_ms` and `sequence`; nothing
/// else carries over between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    /// The clock advanced: restart the sequence at zero.
    NewMillisecond,
    /// Same millisecond with sequence values left.
    SameMillisecond,
    /// Same millisecond and the sequence wrapped: wait for the next one.
    SequenceExhausted,
    /// The clock reads earlier than the last issued millisecond.
    ClockBehind {
        /// Milliseconds between the current reading and `last_ms`.
        behind_ms: i64,
    },
}

impl Tick {
    /// `sequence` must already be masked to the sequence field.
    pub(crate) fn classify(now: i64, last_ms: i64, sequence: i64) -> Self {
        match now.cmp(&last_ms) {
            Ordering::Greater => Self::NewMillisecond,
            Ordering::Equal if sequence == 0 => Self::SequenceExhausted,
            Ordering::Equal => Self::SameMillisecond,
            Ordering::Less => Self::ClockBehind {
                behind_ms: last_ms - now,
            },
        }
    }
}
