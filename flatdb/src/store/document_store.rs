use indexmap::IndexMap;

use crate::collection::Document;
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use crate::store::DocumentKey;

/// The authoritative, insertion-ordered set of loaded documents.
///
/// Documents declaring `id` and `type` are addressed by their composite key
/// and a later document with the same identity replaces the earlier one in
/// place. Documents without identity are kept under their position, so the
/// key-addressed and positional modes coexist in one store.
///
/// The store has a single writer: the loader, and the resolution pass through
/// [DocumentStore::replace]. It is read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentStore {
    documents: IndexMap<DocumentKey, Document>,
    next_position: usize,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore {
            documents: IndexMap::new(),
            next_position: 0,
        }
    }

    /// Rebuilds a store from previously persisted entries.
    pub fn from_entries(documents: IndexMap<DocumentKey, Document>) -> Self {
        let next_position = documents
            .keys()
            .filter_map(|key| match key {
                DocumentKey::Position(position) => Some(position + 1),
                DocumentKey::Composite(_) => None,
            })
            .max()
            .unwrap_or(0);

        DocumentStore {
            documents,
            next_position,
        }
    }

    /// Adds a document and returns the key it was stored under.
    ///
    /// Last write wins for documents sharing a composite key.
    pub fn ingest(&mut self, document: Document) -> DocumentKey {
        let key = match document.composite_key() {
            Some(composite) => DocumentKey::Composite(composite),
            None => {
                let key = DocumentKey::Position(self.next_position);
                self.next_position += 1;
                key
            }
        };

        if self.documents.insert(key.clone(), document).is_some() {
            log::debug!("Document {} overwritten by a later document", key);
        }
        key
    }

    /// Adds every document of the iterator, in order.
    pub fn ingest_all<I: IntoIterator<Item = Document>>(&mut self, documents: I) {
        for document in documents {
            self.ingest(document);
        }
    }

    /// Returns the document stored under the key.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::NotFound] if the key is unknown.
    pub fn get(&self, key: &DocumentKey) -> FlatDbResult<&Document> {
        self.documents.get(key).ok_or_else(|| {
            log::debug!("No document stored under {}", key);
            FlatDbError::new(
                &format!("No document stored under {}", key),
                ErrorKind::NotFound,
            )
        })
    }

    /// Swaps the document stored under an existing key.
    pub(crate) fn replace(&mut self, key: &DocumentKey, document: Document) -> FlatDbResult<()> {
        match self.documents.get_mut(key) {
            Some(slot) => {
                *slot = document;
                Ok(())
            }
            None => {
                log::error!("Cannot replace missing document {}", key);
                Err(FlatDbError::new(
                    &format!("Cannot replace missing document {}", key),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.documents.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DocumentKey> {
        self.documents.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentKey, &Document)> {
        self.documents.iter()
    }

    pub fn entries(&self) -> &IndexMap<DocumentKey, Document> {
        &self.documents
    }
}
