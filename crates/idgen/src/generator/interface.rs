use crate::{Result, SnowflakeId};

/// A minimal interface for generating Snowflake IDs.
pub trait IdGenerator {
    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock is unusable or, with the std mutex, the
    /// state lock is poisoned.
    fn next_id(&self) -> Result<SnowflakeId>;

    /// Returns the largest node ID the generator's layout can hold.
    fn max_node_id(&self) -> i64;

    /// Generates the next ID, treating any failure as fatal.
    ///
    /// Only for callers with no local recovery path. Prefer
    /// [`IdGenerator::next_id`].
    ///
    /// # Panics
    ///
    /// Panics if [`IdGenerator::next_id`] returns an error.
    fn next_id_must(&self) -> SnowflakeId {
        match self.next_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "unrecoverable id generation failure");
                panic!("id generation failed: {e}");
            }
        }
    }
}

/// Returns the largest node ID for `generator`, or `0` when there is none.
///
/// `0` here is a placeholder, not a statement about any layout.
///
/// ```
/// use idgen::{IdWorker, max_node_id};
///
/// assert_eq!(max_node_id::<IdWorker>(None), 0);
/// ```
pub fn max_node_id<G: IdGenerator>(generator: Option<&G>) -> i64 {
    generator.map_or(0, IdGenerator::max_node_id)
}
