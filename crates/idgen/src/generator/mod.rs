mod interface;
mod mutex;
mod status;
mod worker;

pub use interface::*;
pub(crate) use mutex::*;
pub use worker::*;
