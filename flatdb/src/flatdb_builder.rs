use std::sync::Arc;

use crate::content::LinkBuilder;
use crate::errors::{FlatDbError, FlatDbResult};
use crate::flatdb::FlatDb;
use crate::flatdb_config::FlatDbConfig;
use crate::source::DocumentSource;
use crate::store::{CacheStorage, CacheStorageProvider};

/// Builder for configuring and opening a [FlatDb].
///
/// Configuration errors do not interrupt the chain: the first one is
/// captured and returned by [FlatDbBuilder::open].
///
/// # Examples
///
/// ```rust,ignore
/// use flatdb::source::FileSource;
/// use flatdb::content::RouteLinkBuilder;
/// use flatdb::FlatDb;
///
/// let db = FlatDb::builder()
///     .index_fields(&["slug", "collection"])
///     .link_builder(RouteLinkBuilder::new())
///     .open(&FileSource::new("content/site.db"))?;
/// ```
#[derive(Default)]
pub struct FlatDbBuilder {
    error: Option<FlatDbError>,
    config: FlatDbConfig,
}

impl FlatDbBuilder {
    /// Creates a builder with the default configuration: no index fields,
    /// route resolution on and caching on.
    pub fn new() -> Self {
        FlatDbBuilder {
            error: None,
            config: FlatDbConfig::new(),
        }
    }

    /// Adds a field to index. Blank names are skipped.
    pub fn index_field(mut self, field: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.add_index_field(field) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn index_fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            self = self.index_field(field);
        }
        self
    }

    /// Whether relative routes and placeholders are resolved at load.
    pub fn resolve_routes(mut self, enabled: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_resolve_routes(enabled) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Whether a persisted snapshot is read and written.
    pub fn use_cache(mut self, enabled: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_use_cache(enabled) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Persists the snapshot to `storage` instead of the source's default.
    pub fn cache_storage<T: CacheStorageProvider + 'static>(mut self, storage: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_cache_storage(CacheStorage::new(storage)) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Attaches `link` summaries to routed query results.
    pub fn link_builder<T: LinkBuilder + 'static>(mut self, builder: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_link_builder(Arc::new(builder)) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Loads `source` into a new database.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error captured by the builder, or the
    /// error of a source that cannot be read.
    pub fn open(self, source: &dyn DocumentSource) -> FlatDbResult<FlatDb> {
        if let Some(err) = self.error {
            return Err(err);
        }
        FlatDb::open(self.config, source)
    }
}
