//! Common types, constants and helpers shared by every module.

mod constants;
mod sort_order;
mod value;
pub mod util;

pub use constants::*;
pub use sort_order::*;
pub use util::*;
pub use value::*;
