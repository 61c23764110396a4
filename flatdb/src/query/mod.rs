//! Querying loaded documents.
//!
//! A [Query] is a set of equality filters plus three control keys:
//!
//! - `_limit` - `1` returns a single document, any other positive value
//!   truncates the ordered result, `0` means no limit
//! - `_offset` - kept on the query for callers, never applied
//! - `_orderby` - `"<field> <ASC|DESC>"`, `"order ASC"` by default
//!
//! The [QueryEngine] intersects the index buckets of all filters, orders the
//! matching documents with [sort_by_field] and shapes them into a
//! [QueryResult]. A query matching nothing fails with `NotFound`.

mod engine;
mod find_query;
mod ordering;
mod query_result;

pub use engine::*;
pub use find_query::*;
pub use ordering::*;
pub use query_result::*;
