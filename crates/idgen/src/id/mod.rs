mod layout;
mod snowflake;

pub use layout::*;
pub use snowflake::*;
