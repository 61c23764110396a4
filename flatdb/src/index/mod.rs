//! Secondary indexes over loaded documents.
//!
//! An [InvertedIndex] maps the canonical text of every scalar value held by a
//! configured field to the keys of the documents holding it. The index is
//! always rebuilt wholesale from the store; there is no incremental update.
//!
//! ```rust,ignore
//! let mut index = InvertedIndex::new();
//! index.build(&store, &["type".to_string(), "collection".to_string()]);
//! let posts = index.search("type", &Value::from("posts"));
//! ```

mod inverted_index;

pub use inverted_index::*;
