use chrono::{DateTime, Utc};
use std::ops::Deref;
use std::sync::Arc;

use crate::errors::FlatDbResult;

/// Decides whether a persisted cache must be rebuilt.
///
/// A missing cache is always stale. A source that cannot report a
/// modification time never invalidates an existing cache; otherwise the cache
/// is stale when it predates the source.
pub fn is_stale(source_marker: Option<DateTime<Utc>>, cache_marker: Option<DateTime<Utc>>) -> bool {
    match (source_marker, cache_marker) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(source), Some(cache)) => cache < source,
    }
}

/// Low level access to the place a cache snapshot is persisted.
///
/// Implementations only move text around; encoding and decoding of the
/// snapshot happen in [crate::store::Snapshot].
pub trait CacheStorageProvider: Send + Sync {
    /// Modification time of the persisted cache, `None` if there is none.
    fn marker(&self) -> FlatDbResult<Option<DateTime<Utc>>>;

    /// Reads the persisted text, `None` if nothing was written yet.
    fn read(&self) -> FlatDbResult<Option<String>>;

    /// Replaces the persisted text.
    fn write(&self, text: &str) -> FlatDbResult<()>;
}

/// Shared handle over a [CacheStorageProvider].
///
/// ```text
/// let storage = CacheStorage::new(FileCacheStorage::for_source("content.yml"));
/// if is_stale(source.marker()?, storage.marker()?) { ... }
/// ```
#[derive(Clone)]
pub struct CacheStorage {
    inner: Arc<dyn CacheStorageProvider>,
}

impl CacheStorage {
    pub fn new<T: CacheStorageProvider + 'static>(inner: T) -> Self {
        CacheStorage {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for CacheStorage {
    type Target = Arc<dyn CacheStorageProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
