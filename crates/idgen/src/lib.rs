//! # idgen
//!
//! Coordination-free, roughly time-ordered 63-bit identifiers for a single
//! node. Each ID packs milliseconds since [`BASE_EPOCH`], an operator
//! assigned node ID and a per-millisecond sequence into an `i64` whose top
//! bit is always clear.
//!
//! ```
//! use idgen::IdWorker;
//!
//! let worker = IdWorker::new(7, 0, 0).unwrap(); // 14 sequence bits, 5 node bits
//! let id = worker.next_id().unwrap();
//! assert!(id.to_raw() >= 0);
//! assert_eq!(worker.decompose(id).node_id, 7);
//! ```
//!
//! Node IDs must be unique among concurrently running workers; allocating
//! them is left to the caller.

mod config;
mod error;
mod generator;
mod id;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
