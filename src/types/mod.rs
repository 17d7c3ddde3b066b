//! Data types for rooms, roll-number pools, input tables and engine output.

mod assignment;
mod pool;
mod room;
mod table;

pub use assignment::*;
pub use pool::*;
pub use room::*;
pub use table::*;
