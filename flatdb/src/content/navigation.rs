use indexmap::{IndexMap, IndexSet};

use crate::collection::Document;
use crate::common::{
    strip_internal, Value, COLLECTIONS_TYPE, COLLECTION_FIELD, MAX_BREADCRUMB_DEPTH,
    MISSING_TITLE, NAVIGATION_TITLE_FIELD, ROUTE_FIELD, TITLE_FIELD,
};
use crate::content::{LinkBuilder, LinkContext, LinkSummary};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use crate::index::InvertedIndex;
use crate::query::{by_identity, Query, QueryEngine, QueryResult};
use crate::store::{DocumentKey, DocumentStore};

/// Site navigation derived from the `collection` links between documents.
///
/// Every document may name its parent through `collection`; the parent is
/// the `collections` document with that id.
pub struct Navigation<'a> {
    store: &'a DocumentStore,
    index: &'a InvertedIndex,
    builder: &'a dyn LinkBuilder,
    context: &'a LinkContext,
}

impl<'a> Navigation<'a> {
    pub fn new(
        store: &'a DocumentStore,
        index: &'a InvertedIndex,
        builder: &'a dyn LinkBuilder,
        context: &'a LinkContext,
    ) -> Self {
        Navigation {
            store,
            index,
            builder,
            context,
        }
    }

    fn engine(&self) -> QueryEngine<'a> {
        QueryEngine::new(self.store, self.index).with_link_builder(self.builder, self.context)
    }

    /// Documents whose `collection` is `id`, grouped by their `type`.
    ///
    /// Returns an empty map when the collection has no children.
    pub fn children(&self, id: &str, keep_internal: bool) -> FlatDbResult<IndexMap<String, Vec<Document>>> {
        let mut groups: IndexMap<String, Vec<Document>> = IndexMap::new();
        let query = Query::new().filter(COLLECTION_FIELD, id);

        let children = match self.engine().query(&query, true) {
            Ok(result) => result.into_vec(),
            Err(err) if err.is_not_found() => return Ok(groups),
            Err(err) => return Err(err),
        };

        for child in children {
            let Some(doc_type) = child.doc_type() else {
                log::warn!("Child of {} has no type: {}", id, child);
                continue;
            };
            let child = if keep_internal {
                child
            } else {
                strip_internal(&child)
            };
            groups.entry(doc_type).or_default().push(child);
        }
        Ok(groups)
    }

    /// The trail of links from the site root down to a document.
    ///
    /// Starts at the document, follows `collection` upwards and stops at the
    /// first missing or unrouted ancestor. The result is root first.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::CycleDetected] when the chain revisits a
    /// document or grows deeper than the configured cap.
    pub fn breadcrumbs(&self, doc_type: &str, id: &str) -> FlatDbResult<Vec<LinkSummary>> {
        let engine = self.engine();
        let mut trail = Vec::new();
        let mut visited = IndexSet::new();
        let mut next = Some((doc_type.to_string(), id.to_string()));

        while let Some((doc_type, id)) = next.take() {
            let key = DocumentKey::composite(&doc_type, &id);
            if !visited.insert(key.clone()) || visited.len() > MAX_BREADCRUMB_DEPTH {
                log::error!("Breadcrumb trail loops back at {}", key);
                return Err(FlatDbError::new(
                    &format!("Breadcrumb trail loops back at {}", key),
                    ErrorKind::CycleDetected,
                ));
            }

            let item = match engine.query(&by_identity(&doc_type, &id), true) {
                Ok(result) => match result.into_one() {
                    Some(item) => item,
                    None => break,
                },
                Err(err) if err.is_not_found() => break,
                Err(err) => return Err(err),
            };

            if !item.has(ROUTE_FIELD) {
                break;
            }
            trail.push(self.builder.link_to(&item, self.context));

            next = item
                .get(COLLECTION_FIELD)
                .and_then(|collection| collection.identity_text())
                .map(|collection| (COLLECTIONS_TYPE.to_string(), collection));
        }

        trail.reverse();
        Ok(trail)
    }

    /// The title of the first matching document: `title`, else
    /// `navigationTitle`, else `N/A`.
    pub fn title_of(&self, query: &Query) -> FlatDbResult<String> {
        let result = self.engine().query(query, false)?;
        let title = result.first().and_then(|document| {
            document
                .get_str(TITLE_FIELD)
                .or_else(|| document.get_str(NAVIGATION_TITLE_FIELD))
        });
        Ok(title.unwrap_or(MISSING_TITLE).to_string())
    }

    /// Links of the matching documents: one link document for a single
    /// result, a sequence of them otherwise.
    pub fn link(&self, query: &Query) -> FlatDbResult<Value> {
        let result = self.engine().query(query, true)?;
        Ok(match result {
            QueryResult::One(document) => {
                Value::Document(self.builder.link_to(&document, self.context).to_document())
            }
            QueryResult::Many(documents) => Value::Array(
                documents
                    .iter()
                    .map(|document| Value::Document(self.builder.link_to(document, self.context).to_document()))
                    .collect(),
            ),
        })
    }

    /// The href of the first matching document.
    pub fn href(&self, query: &Query) -> FlatDbResult<Value> {
        let result = self.engine().query(query, true)?;
        match result.first() {
            Some(document) => Ok(self.builder.href_to(document, self.context)),
            None => Err(FlatDbError::new(
                "Your query returned zero results",
                ErrorKind::NotFound,
            )),
        }
    }
}
