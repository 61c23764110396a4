//! Load-time route resolution.
//!
//! A document may declare its `route` relative to the route of its parent
//! collection (`./child`, `../sibling`) and may reference its own fields in
//! string values through `{{field}}` placeholders. [RouteResolver] turns both
//! into final values once, right after a fresh load.

mod expansion;
mod placeholder;
mod resolver;

pub use expansion::*;
pub use placeholder::*;
pub use resolver::*;
