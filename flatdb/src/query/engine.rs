use indexmap::IndexSet;

use crate::collection::Document;
use crate::common::{strip_internal, Value, ID_FIELD, LINK_FIELD, ROUTE_FIELD, TYPE_FIELD};
use crate::content::{LinkBuilder, LinkContext};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use crate::index::InvertedIndex;
use crate::query::{sort_by_field, Query, QueryResult};
use crate::store::{DocumentKey, DocumentStore};

/// Answers equality queries against a store and its index.
///
/// The engine borrows both and never mutates them. Every document it returns
/// is an owned copy shaped for the caller: a `link` is attached to routed
/// documents when a [LinkBuilder] is configured, and internal fields are
/// removed unless `keep_internal` is requested.
pub struct QueryEngine<'a> {
    store: &'a DocumentStore,
    index: &'a InvertedIndex,
    links: Option<(&'a dyn LinkBuilder, &'a LinkContext)>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a DocumentStore, index: &'a InvertedIndex) -> Self {
        QueryEngine {
            store,
            index,
            links: None,
        }
    }

    pub fn with_link_builder(mut self, builder: &'a dyn LinkBuilder, context: &'a LinkContext) -> Self {
        self.links = Some((builder, context));
        self
    }

    /// Parses a filter document and runs it.
    pub fn query_document(&self, filter: &Document, keep_internal: bool) -> FlatDbResult<QueryResult> {
        let query = Query::from_document(filter)?;
        self.query(&query, keep_internal)
    }

    /// Runs a query.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::InvalidQuery] - no filters, a non-scalar filter value,
    ///   or `id` without `type`
    /// * [ErrorKind::NotFound] - nothing matched
    pub fn query(&self, query: &Query, keep_internal: bool) -> FlatDbResult<QueryResult> {
        let keys = self.find_keys(query)?;

        if keys.is_empty() {
            log::debug!("Query {:?} returned zero results", query.filters());
            return Err(FlatDbError::new(
                "Your query returned zero results",
                ErrorKind::NotFound,
            ));
        }

        if query.is_single() {
            let key = keys.first().ok_or_else(|| {
                FlatDbError::new("Your query returned zero results", ErrorKind::NotFound)
            })?;
            let document = self.store.get(key)?;
            return Ok(QueryResult::One(self.shape(document, keep_internal)));
        }

        let documents = keys
            .iter()
            .map(|key| self.store.get(key))
            .collect::<FlatDbResult<Vec<&Document>>>()?;

        let order_by = query.order_by();
        let mut sorted = sort_by_field(documents, order_by.field(), order_by.order());
        if let Some(limit) = query.get_limit() {
            sorted.truncate(limit);
        }

        Ok(QueryResult::Many(
            sorted
                .into_iter()
                .map(|document| self.shape(document, keep_internal))
                .collect(),
        ))
    }

    fn find_keys(&self, query: &Query) -> FlatDbResult<IndexSet<DocumentKey>> {
        let filters = query.filters();
        if filters.is_empty() {
            log::error!("Query has no filters");
            return Err(FlatDbError::new(
                "Query requires at least one filter",
                ErrorKind::InvalidQuery,
            ));
        }

        for (field, value) in filters {
            if !value.is_scalar() {
                log::error!("Filter {} has a non-scalar value {}", field, value);
                return Err(FlatDbError::new(
                    &format!("Filter {} must hold a string, number or boolean", field),
                    ErrorKind::InvalidQuery,
                ));
            }
        }

        let mut subsets: Vec<IndexSet<DocumentKey>> = Vec::with_capacity(filters.len());

        if let Some(id) = filters.get(ID_FIELD) {
            let doc_type = filters.get(TYPE_FIELD).ok_or_else(|| {
                log::error!("Querying by id requires passing type");
                FlatDbError::new("Querying by id requires passing type", ErrorKind::InvalidQuery)
            })?;
            subsets.push(self.identity_subset(doc_type, id));
        }

        for (field, value) in filters {
            if field == ID_FIELD || (field == TYPE_FIELD && filters.contains_key(ID_FIELD)) {
                continue;
            }
            if !self.index.has_field(field) {
                log::warn!("Filtering on {} which is not an indexed field", field);
            }
            subsets.push(self.index.search(field, value));
        }

        let mut intersection: Option<IndexSet<DocumentKey>> = None;
        for subset in subsets {
            if subset.is_empty() {
                return Ok(IndexSet::new());
            }
            intersection = Some(match intersection {
                None => subset,
                Some(mut current) => {
                    current.retain(|key| subset.contains(key));
                    current
                }
            });
        }
        Ok(intersection.unwrap_or_default())
    }

    fn identity_subset(&self, doc_type: &Value, id: &Value) -> IndexSet<DocumentKey> {
        let mut subset = IndexSet::new();
        if let (Some(doc_type), Some(id)) = (doc_type.identity_text(), id.identity_text()) {
            let key = DocumentKey::composite(&doc_type, &id);
            if self.store.contains(&key) {
                subset.insert(key);
            }
        }
        subset
    }

    fn shape(&self, document: &Document, keep_internal: bool) -> Document {
        let mut shaped = document.clone();

        if let Some((builder, context)) = self.links {
            if shaped.has(ROUTE_FIELD) && !shaped.contains_key(LINK_FIELD) {
                let link = builder.link_to(document, context);
                // LINK_FIELD is not empty
                let _ = shaped.put(LINK_FIELD, link.to_document());
            }
        }

        if keep_internal {
            shaped
        } else {
            strip_internal(&shaped)
        }
    }
}
