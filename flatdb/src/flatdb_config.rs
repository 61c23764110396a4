//! Configuration management for a flatdb database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::content::LinkBuilder;
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use crate::index::canonical_field_name;
use crate::query::is_control_key;
use crate::store::CacheStorage;

/// Public interface for database configuration.
///
/// The configuration is frozen once the database it belongs to has been
/// opened; every setter called afterwards fails with
/// [ErrorKind::InvalidOperation].
///
/// # Examples
///
/// ```rust,ignore
/// use flatdb::FlatDb;
///
/// let db = FlatDb::builder()
///     .index_fields(&["slug", "tags"])
///     .resolve_routes(true)
///     .open(&source)?;
/// ```
#[derive(Clone)]
pub struct FlatDbConfig {
    inner: Arc<FlatDbConfigInner>,
}

impl Default for FlatDbConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatDbConfig {
    /// Creates a configuration with no index fields, route resolution on
    /// and caching on.
    pub fn new() -> Self {
        FlatDbConfig {
            inner: Arc::new(FlatDbConfigInner::new()),
        }
    }

    /// Adds a field to index. The name is stored in its canonical (bare)
    /// form, so `_slug` and `slug` name the same index.
    ///
    /// # Errors
    ///
    /// Returns error if already configured or if the name is a query
    /// control key.
    pub fn add_index_field(&self, field: &str) -> FlatDbResult<()> {
        self.inner.add_index_field(field)
    }

    /// The configured index fields, in insertion order.
    pub fn index_fields(&self) -> Vec<String> {
        self.inner.index_fields.read_with(|fields| fields.clone())
    }

    pub fn resolve_routes(&self) -> bool {
        self.inner.resolve_routes.load(Ordering::Relaxed)
    }

    /// Turns the load-time route resolution on or off.
    ///
    /// # Errors
    ///
    /// Returns error if already configured.
    pub fn set_resolve_routes(&self, enabled: bool) -> FlatDbResult<()> {
        self.inner.check_not_configured("Route resolution")?;
        self.inner.resolve_routes.store(enabled, Ordering::Relaxed);
        Ok(())
    }

    pub fn use_cache(&self) -> bool {
        self.inner.use_cache.load(Ordering::Relaxed)
    }

    /// Turns the persisted snapshot on or off.
    ///
    /// # Errors
    ///
    /// Returns error if already configured.
    pub fn set_use_cache(&self, enabled: bool) -> FlatDbResult<()> {
        self.inner.check_not_configured("Cache usage")?;
        self.inner.use_cache.store(enabled, Ordering::Relaxed);
        Ok(())
    }

    /// The explicitly configured cache storage, if any.
    pub fn cache_storage(&self) -> Option<CacheStorage> {
        self.inner.cache_storage.read_with(|storage| storage.clone())
    }

    /// Sets the storage the snapshot is persisted to, overriding the
    /// source's default.
    ///
    /// # Errors
    ///
    /// Returns error if already configured.
    pub fn set_cache_storage(&self, storage: CacheStorage) -> FlatDbResult<()> {
        self.inner.check_not_configured("Cache storage")?;
        self.inner
            .cache_storage
            .write_with(|it| *it = Some(storage));
        Ok(())
    }

    pub fn link_builder(&self) -> Option<Arc<dyn LinkBuilder>> {
        self.inner.link_builder.read_with(|builder| builder.clone())
    }

    /// Sets the link builder attaching `link` summaries to query results.
    ///
    /// # Errors
    ///
    /// Returns error if already configured.
    pub fn set_link_builder(&self, builder: Arc<dyn LinkBuilder>) -> FlatDbResult<()> {
        self.inner.check_not_configured("Link builder")?;
        self.inner.link_builder.write_with(|it| *it = Some(builder));
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_configured(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }
}

struct FlatDbConfigInner {
    configured: AtomicBool,
    index_fields: Atomic<Vec<String>>,
    resolve_routes: AtomicBool,
    use_cache: AtomicBool,
    cache_storage: Atomic<Option<CacheStorage>>,
    link_builder: Atomic<Option<Arc<dyn LinkBuilder>>>,
}

impl FlatDbConfigInner {
    fn new() -> Self {
        FlatDbConfigInner {
            configured: AtomicBool::new(false),
            index_fields: atomic(Vec::new()),
            resolve_routes: AtomicBool::new(true),
            use_cache: AtomicBool::new(true),
            cache_storage: atomic(None),
            link_builder: atomic(None),
        }
    }

    fn check_not_configured(&self, setting: &str) -> FlatDbResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after initialization", setting);
            return Err(FlatDbError::new(
                &format!("{} cannot be changed after initialization", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn add_index_field(&self, field: &str) -> FlatDbResult<()> {
        self.check_not_configured("Index fields")?;

        let field = field.trim();
        if is_control_key(field) {
            log::error!("Query control key '{}' cannot be indexed", field);
            return Err(FlatDbError::new(
                &format!("Query control key '{}' cannot be indexed", field),
                ErrorKind::InvalidOperation,
            ));
        }

        let field = canonical_field_name(field);
        if field.is_empty() {
            log::warn!("Skipping blank index field name");
            return Ok(());
        }

        self.index_fields.write_with(|fields| {
            if !fields.iter().any(|it| it == field) {
                fields.push(field.to_string());
            }
        });
        Ok(())
    }
}
