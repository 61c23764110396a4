//! Content presentation helpers built on top of the query engine.
//!
//! [link] turns documents into navigation links for a given request and
//! [navigation] walks the `collection` hierarchy (children, breadcrumbs,
//! titles).

pub mod link;
pub mod navigation;

pub use link::*;
pub use navigation::*;
