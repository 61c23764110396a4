use indexmap::{IndexMap, IndexSet};

use crate::common::{Value, COLLECTIONS_TYPE, COLLECTION_FIELD, ROUTE_FIELD};
use crate::errors::{ErrorKind, FlatDbError};
use crate::index::InvertedIndex;
use crate::query::{by_identity, QueryEngine};
use crate::route::{expand_route, interpolate_placeholders, is_relative};
use crate::store::{DocumentKey, DocumentStore};

/// The one-time resolution pass run right after a fresh load.
///
/// 1. Placeholders are interpolated in every document.
/// 2. Relative routes are expanded against the route of the parent
///    collection, resolving nested parents first.
///
/// Problems are never fatal: each one is logged and returned, and the
/// offending document keeps its route as written. The index is rebuilt after
/// each step, so it always reflects the resolved documents.
pub struct RouteResolver {
    index_fields: Vec<String>,
}

impl RouteResolver {
    pub fn new(index_fields: &[String]) -> RouteResolver {
        RouteResolver {
            index_fields: index_fields.to_vec(),
        }
    }

    /// Runs both steps and returns the problems found.
    pub fn resolve(&self, store: &mut DocumentStore, index: &mut InvertedIndex) -> Vec<FlatDbError> {
        let mut issues = Vec::new();

        let interpolated: Vec<_> = store
            .iter()
            .filter_map(|(key, document)| {
                interpolate_placeholders(document).map(|document| (key.clone(), document))
            })
            .collect();
        log::debug!("Interpolated placeholders in {} documents", interpolated.len());
        for (key, document) in interpolated {
            if let Err(err) = store.replace(&key, document) {
                issues.push(err);
            }
        }
        index.build(store, &self.index_fields);

        let routes = {
            let mut pass = RoutePass::new(store, index);
            let relative: Vec<DocumentKey> = store
                .iter()
                .filter(|(_, document)| document.get(ROUTE_FIELD).is_some_and(is_relative))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &relative {
                pass.resolve(key);
            }
            issues.append(&mut pass.issues);
            pass.expanded
        };

        let mut updated = 0;
        for (key, route) in routes {
            let Some(route) = route else { continue };
            let Ok(document) = store.get(&key) else { continue };
            let mut document = document.clone();
            if let Err(err) = document.put(ROUTE_FIELD, route) {
                issues.push(err);
                continue;
            }
            match store.replace(&key, document) {
                Ok(()) => updated += 1,
                Err(err) => issues.push(err),
            }
        }
        log::debug!("Expanded {} relative routes", updated);
        index.build(store, &self.index_fields);

        for issue in &issues {
            log::warn!("{}: {}", issue.kind(), issue.message());
        }
        issues
    }
}

struct RoutePass<'a> {
    store: &'a DocumentStore,
    engine: QueryEngine<'a>,
    // resolved route per relative document, `None` when it cannot be expanded
    expanded: IndexMap<DocumentKey, Option<Value>>,
    visiting: IndexSet<DocumentKey>,
    issues: Vec<FlatDbError>,
}

impl<'a> RoutePass<'a> {
    fn new(store: &'a DocumentStore, index: &'a InvertedIndex) -> Self {
        RoutePass {
            store,
            engine: QueryEngine::new(store, index),
            expanded: IndexMap::new(),
            visiting: IndexSet::new(),
            issues: Vec::new(),
        }
    }

    /// Returns the final route of a document.
    fn resolve(&mut self, key: &DocumentKey) -> Option<Value> {
        if let Some(route) = self.expanded.get(key) {
            return route.clone();
        }

        let document = self.store.get(key).ok()?;
        let own = document.get(ROUTE_FIELD).filter(|route| !route.is_null())?.clone();
        if !is_relative(&own) {
            return Some(own);
        }

        if self.visiting.contains(key) {
            self.report(
                ErrorKind::CycleDetected,
                format!("Collection chain of {} loops back onto itself", key),
            );
            return None;
        }

        let Some(collection) = document.get(COLLECTION_FIELD).and_then(|c| c.identity_text()) else {
            self.report(
                ErrorKind::InvalidRoute,
                format!("{} has a relative route but no collection", key),
            );
            self.expanded.insert(key.clone(), None);
            return None;
        };

        let parent = match self
            .engine
            .query(&by_identity(COLLECTIONS_TYPE, &collection), true)
            .map(|result| result.into_one())
        {
            Ok(Some(parent)) => parent,
            Ok(None) => {
                self.expanded.insert(key.clone(), None);
                return None;
            }
            Err(err) if err.is_not_found() => {
                self.report(
                    ErrorKind::ParentMissing,
                    format!("{} belongs to missing collection {}", key, collection),
                );
                self.expanded.insert(key.clone(), None);
                return None;
            }
            Err(err) => {
                self.issues.push(err);
                self.expanded.insert(key.clone(), None);
                return None;
            }
        };

        if !parent.has(ROUTE_FIELD) {
            self.report(
                ErrorKind::InvalidRoute,
                format!("{} has a relative route but collection {} has no route", key, collection),
            );
            self.expanded.insert(key.clone(), None);
            return None;
        }

        self.visiting.insert(key.clone());
        let parent_route = self.resolve(&DocumentKey::composite(COLLECTIONS_TYPE, &collection));
        self.visiting.shift_remove(key);

        // the parent already reported why it has no usable route
        let route = match parent_route {
            Some(parent_route) => match expand_route(&parent_route, &own) {
                Ok(route) => Some(route),
                Err(err) => {
                    self.issues.push(FlatDbError::new(
                        &format!("{}: {}", key, err.message()),
                        ErrorKind::InvalidRoute,
                    ));
                    None
                }
            },
            None => None,
        };

        self.expanded.insert(key.clone(), route.clone());
        route
    }

    fn report(&mut self, kind: ErrorKind, message: String) {
        self.issues.push(FlatDbError::new(&message, kind));
    }
}
