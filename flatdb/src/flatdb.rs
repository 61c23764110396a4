use indexmap::IndexMap;
use itertools::Itertools;
use std::sync::Arc;

use crate::collection::Document;
use crate::common::Value;
use crate::content::{LinkBuilder, LinkContext, LinkSummary, Navigation, RouteLinkBuilder};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use crate::flatdb_builder::FlatDbBuilder;
use crate::flatdb_config::FlatDbConfig;
use crate::index::InvertedIndex;
use crate::query::{by_identity, Query, QueryEngine, QueryResult};
use crate::route::RouteResolver;
use crate::source::DocumentSource;
use crate::store::{is_stale, CacheStorage, DocumentStore, Snapshot};

static FALLBACK_LINKS: RouteLinkBuilder = RouteLinkBuilder;

/// How the last load went.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    used_cache: bool,
    issues: Vec<FlatDbError>,
}

impl LoadReport {
    /// `true` when the documents came from the persisted snapshot.
    pub fn used_cache(&self) -> bool {
        self.used_cache
    }

    /// Problems met while resolving routes. A document listed here kept its
    /// unresolved route.
    pub fn issues(&self) -> &[FlatDbError] {
        &self.issues
    }
}

/// A loaded, read-only document database.
///
/// `FlatDb` is opened once from a [DocumentSource] and then serves any
/// number of queries. Loading goes through these steps:
///
/// 1. a fresh snapshot from the cache storage is used as is
/// 2. otherwise every source document is ingested and indexed, relative
///    routes are resolved, and the result is written back to the cache
///
/// A stale, corrupt or empty cache only costs a rebuild. Clones share the
/// loaded state.
///
/// # Examples
///
/// ```rust,ignore
/// use flatdb::query::by_type;
/// use flatdb::source::FileSource;
/// use flatdb::FlatDb;
///
/// let db = FlatDb::builder()
///     .index_fields(&["type", "collection"])
///     .open(&FileSource::new("content/site.db"))?;
///
/// let posts = db.query(&by_type("posts").filter("collection", "blog").limit(10))?;
/// for post in posts {
///     println!("{}", post);
/// }
/// ```
#[derive(Clone)]
pub struct FlatDb {
    inner: Arc<FlatDbInner>,
}

impl FlatDb {
    /// Creates a new [FlatDbBuilder].
    pub fn builder() -> FlatDbBuilder {
        FlatDbBuilder::new()
    }

    pub(crate) fn open(config: FlatDbConfig, source: &dyn DocumentSource) -> FlatDbResult<FlatDb> {
        let inner = FlatDbInner::open(config, source)?;
        Ok(FlatDb {
            inner: Arc::new(inner),
        })
    }

    /// Runs a query for public output: internal fields are stripped.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::NotFound] - nothing matched
    /// * [ErrorKind::InvalidQuery] - the query is malformed
    pub fn query(&self, query: &Query) -> FlatDbResult<QueryResult> {
        self.query_with_context(query, false, &LinkContext::default())
    }

    /// Runs a query, rendering links for `context`. With `keep_internal`
    /// the `_name` fields are kept.
    pub fn query_with_context(
        &self,
        query: &Query,
        keep_internal: bool,
        context: &LinkContext,
    ) -> FlatDbResult<QueryResult> {
        self.inner.engine(context).query(query, keep_internal)
    }

    /// Runs a query given as a filter document with `_limit`, `_offset` and
    /// `_orderby` control keys.
    pub fn query_document(&self, filter: &Document) -> FlatDbResult<QueryResult> {
        let context = LinkContext::default();
        self.inner.engine(&context).query_document(filter, false)
    }

    /// The document of the given identity.
    pub fn get(&self, doc_type: &str, id: &str) -> FlatDbResult<Document> {
        self.query(&by_identity(doc_type, id))?
            .into_one()
            .ok_or_else(|| {
                FlatDbError::new(
                    &format!("No document of type '{}' with id '{}'", doc_type, id),
                    ErrorKind::NotFound,
                )
            })
    }

    /// Documents of the collection `id`, grouped by their type.
    pub fn children(&self, id: &str, keep_internal: bool) -> FlatDbResult<IndexMap<String, Vec<Document>>> {
        let context = LinkContext::default();
        self.inner.navigation(&context).children(id, keep_internal)
    }

    /// Root-first links leading to the given document.
    pub fn breadcrumbs(&self, doc_type: &str, id: &str, context: &LinkContext) -> FlatDbResult<Vec<LinkSummary>> {
        self.inner.navigation(context).breadcrumbs(doc_type, id)
    }

    /// The title of the first matching document, `N/A` when it has none.
    pub fn title_of(&self, query: &Query) -> FlatDbResult<String> {
        let context = LinkContext::default();
        self.inner.navigation(&context).title_of(query)
    }

    /// Link documents of the matching documents.
    pub fn link(&self, query: &Query, context: &LinkContext) -> FlatDbResult<Value> {
        self.inner.navigation(context).link(query)
    }

    /// The href of the first matching document.
    pub fn href(&self, query: &Query, context: &LinkContext) -> FlatDbResult<Value> {
        self.inner.navigation(context).href(query)
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.inner.report
    }

    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.inner.index
    }

    /// The persistable image of the loaded state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::save(&self.inner.store, &self.inner.index)
            .with_routes_resolved(self.inner.config.resolve_routes())
    }

    pub fn config(&self) -> &FlatDbConfig {
        &self.inner.config
    }
}

struct FlatDbInner {
    config: FlatDbConfig,
    store: DocumentStore,
    index: InvertedIndex,
    link_builder: Option<Arc<dyn LinkBuilder>>,
    report: LoadReport,
}

impl FlatDbInner {
    fn open(config: FlatDbConfig, source: &dyn DocumentSource) -> FlatDbResult<FlatDbInner> {
        config.mark_configured();
        let index_fields = config.index_fields();
        let resolve_routes = config.resolve_routes();

        let storage = if config.use_cache() {
            config.cache_storage().or_else(|| source.default_cache_storage())
        } else {
            None
        };

        if let Some(storage) = &storage {
            match load_cached(source, storage, &index_fields, resolve_routes) {
                Ok(Some((store, index))) => {
                    log::debug!("Loaded {} documents from cache", store.len());
                    return Ok(FlatDbInner::new(
                        config,
                        store,
                        index,
                        LoadReport {
                            used_cache: true,
                            issues: Vec::new(),
                        },
                    ));
                }
                Ok(None) => {}
                Err(err) => log::warn!("Ignoring unusable cache, rebuilding: {}", err),
            }
        }

        let mut store = DocumentStore::new();
        store.ingest_all(source.documents()?);

        let mut index = InvertedIndex::new();
        index.build(&store, &index_fields);

        let issues = if resolve_routes {
            RouteResolver::new(&index_fields).resolve(&mut store, &mut index)
        } else {
            Vec::new()
        };
        log::debug!(
            "Built {} documents with {} route issues",
            store.len(),
            issues.len()
        );

        if let Some(storage) = &storage {
            persist(storage, &store, &index, resolve_routes);
        }

        Ok(FlatDbInner::new(
            config,
            store,
            index,
            LoadReport {
                used_cache: false,
                issues,
            },
        ))
    }

    fn new(config: FlatDbConfig, store: DocumentStore, index: InvertedIndex, report: LoadReport) -> FlatDbInner {
        FlatDbInner {
            link_builder: config.link_builder(),
            config,
            store,
            index,
            report,
        }
    }

    fn engine<'a>(&'a self, context: &'a LinkContext) -> QueryEngine<'a> {
        let engine = QueryEngine::new(&self.store, &self.index);
        match &self.link_builder {
            Some(builder) => engine.with_link_builder(builder.as_ref(), context),
            None => engine,
        }
    }

    fn navigation<'a>(&'a self, context: &'a LinkContext) -> Navigation<'a> {
        let builder = self.link_builder.as_deref().unwrap_or(&FALLBACK_LINKS);
        Navigation::new(&self.store, &self.index, builder, context)
    }
}

/// Reads the snapshot of `storage` if it is fresh, non-empty and built with
/// the configured index fields and route resolution.
fn load_cached(
    source: &dyn DocumentSource,
    storage: &CacheStorage,
    index_fields: &[String],
    resolve_routes: bool,
) -> FlatDbResult<Option<(DocumentStore, InvertedIndex)>> {
    if is_stale(source.marker()?, storage.marker()?) {
        log::debug!("Cache is missing or older than its source");
        return Ok(None);
    }

    let Some(text) = storage.read()? else {
        return Ok(None);
    };

    let snapshot = Snapshot::decode(&text)?;
    if snapshot.is_empty() {
        log::debug!("Cache holds no documents");
        return Ok(None);
    }

    if !snapshot
        .indexes()
        .fields()
        .sorted()
        .eq(index_fields.iter().sorted())
    {
        log::debug!("Cached index fields differ from the configured ones");
        return Ok(None);
    }

    if snapshot.routes_resolved() != resolve_routes {
        log::debug!("Cache was built with route resolution {}", snapshot.routes_resolved());
        return Ok(None);
    }

    Ok(Some(snapshot.load()))
}

fn persist(
    storage: &CacheStorage,
    store: &DocumentStore,
    index: &InvertedIndex,
    resolve_routes: bool,
) {
    let written = Snapshot::save(store, index)
        .with_routes_resolved(resolve_routes)
        .encode()
        .and_then(|text| storage.write(&text));
    match written {
        Ok(()) => log::debug!("Cache written"),
        Err(err) => log::error!("Failed to write cache: {}", err),
    }
}
