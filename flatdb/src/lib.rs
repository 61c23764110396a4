//! # flatdb - Embedded document store for flat-file content
//!
//! flatdb loads semi-structured documents from a flat textual source once,
//! indexes chosen fields and then answers filtered, ordered and paginated
//! queries from memory. The loaded state is persisted as a JSON snapshot that
//! can always be thrown away and rebuilt from the source.
//!
//! ## Key Features
//!
//! - **Inverted indexes**: exact-match lookups over configured fields, with
//!   `name`, `_name` and `__name__` collapsing onto one logical field
//! - **Ordered queries**: `_limit`, `_offset` and `_orderby` control keys
//! - **Relative routes**: `./child` and `../sibling` routes are expanded
//!   against the parent collection at load time
//! - **Navigation**: links, breadcrumbs and child listings
//! - **Translations**: plural-aware phrase lookups with injected rules
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flatdb::query::by_type;
//! use flatdb::source::FileSource;
//! use flatdb::FlatDb;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = FlatDb::builder()
//!     .index_fields(&["type", "collection"])
//!     .open(&FileSource::new("content/site.db"))?;
//!
//! let posts = db.query(&by_type("posts").filter("collection", "blog"))?;
//! for post in posts {
//!     println!("{}", post);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents and their identity
//! - [`common`] - Values, constants and shared helpers
//! - [`content`] - Links and navigation
//! - [`errors`] - Error types and result definitions
//! - [`index`] - The inverted index
//! - [`query`] - Queries, ordering and the query engine
//! - [`route`] - Load-time route and placeholder resolution
//! - [`source`] - Document sources
//! - [`store`] - Document storage and the snapshot cache
//! - [`translation`] - Phrase translation

pub mod collection;
pub mod common;
pub mod content;
pub mod errors;
pub mod index;
pub mod query;
pub mod route;
pub mod source;
pub mod store;
pub mod translation;

mod flatdb;
mod flatdb_builder;
mod flatdb_config;

pub use crate::common::*;
pub use crate::flatdb::{FlatDb, LoadReport};
pub use crate::flatdb_builder::FlatDbBuilder;
pub use crate::flatdb_config::FlatDbConfig;
