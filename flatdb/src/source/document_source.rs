use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::collection::Document;
use crate::common::document_from_json;
use crate::errors::FlatDbResult;
use crate::store::CacheStorage;

/// Turns the text of one source document into a [Document].
pub type DocumentParser = Arc<dyn Fn(&str) -> FlatDbResult<Document> + Send + Sync>;

/// Parser for sources holding one JSON object per document.
pub fn json_parser() -> DocumentParser {
    Arc::new(document_from_json)
}

/// Where a database loads its documents from.
pub trait DocumentSource {
    /// Last modification time, `None` when the source cannot tell.
    fn marker(&self) -> FlatDbResult<Option<DateTime<Utc>>>;

    /// All documents of the source, in source order.
    fn documents(&self) -> FlatDbResult<Vec<Document>>;

    /// The cache storage used when none is configured explicitly.
    fn default_cache_storage(&self) -> Option<CacheStorage> {
        None
    }
}

/// A source over documents that are already parsed.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    documents: Vec<Document>,
    marker: Option<DateTime<Utc>>,
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> MemorySource {
        MemorySource {
            documents,
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: DateTime<Utc>) -> MemorySource {
        self.marker = Some(marker);
        self
    }
}

impl DocumentSource for MemorySource {
    fn marker(&self) -> FlatDbResult<Option<DateTime<Utc>>> {
        Ok(self.marker)
    }

    fn documents(&self) -> FlatDbResult<Vec<Document>> {
        Ok(self.documents.clone())
    }
}
