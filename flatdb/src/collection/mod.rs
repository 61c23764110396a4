//! Documents, the unit of storage.
//!
//! A `Document` is an insertion-ordered mapping of field names to `Value`s.
//! Nested documents and sequences are plain values.
//!
//! ```rust,ignore
//! use flatdb::doc;
//!
//! let post = doc! {
//!     "type": "posts",
//!     "id": "hello",
//!     "title": "Hello",
//!     "route": "./hello",
//!     "collection": "blog",
//! };
//! assert_eq!(post.composite_key(), Some("posts.hello".to_string()));
//! ```
//!
//! # Reserved Fields
//!
//! - `id`, `type` - the identity, forming the composite key `type.id`
//! - fields starting with `_` - internal, stripped from plain query results

mod document;

pub use document::*;
