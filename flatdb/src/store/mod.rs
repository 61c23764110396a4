//! Document storage and cache persistence.
//!
//! The [DocumentStore] holds every loaded document under its [DocumentKey].
//! A [Snapshot] captures the store together with its index so a later load
//! can skip parsing and resolution; where the snapshot lives is decided by a
//! pluggable [CacheStorage]:
//!
//! - [FileCacheStorage] writes a hidden file next to the source
//! - [MemoryCacheStorage] keeps it in process memory
//!
//! [is_stale] compares the source and cache modification markers.

mod cache;
mod document_key;
mod document_store;
mod file_cache;
mod memory_cache;
mod snapshot;

pub use cache::*;
pub use document_key::*;
pub use document_store::*;
pub use file_cache::*;
pub use memory_cache::*;
pub use snapshot::*;
