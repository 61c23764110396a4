use indexmap::IndexMap;

use crate::collection::Document;
use crate::common::{Value, SNAPSHOT_DATA_KEY, SNAPSHOT_INDEXES_KEY};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use crate::index::InvertedIndex;
use crate::store::{DocumentKey, DocumentStore};

/// The persisted image of a loaded database.
///
/// A snapshot is a pure function of the loaded documents and the configured
/// index fields, so it can always be thrown away and rebuilt from the source.
/// Its JSON form is
///
/// ```text
/// {
///   "indexes": { "<field>": { "<value>": ["<key>", ...] } },
///   "data": { "<key>": { ...document... } },
///   "routes_resolved": true
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    indexes: InvertedIndex,
    data: IndexMap<DocumentKey, Document>,
    #[serde(default)]
    routes_resolved: bool,
}

impl Snapshot {
    /// Captures the current state of a store and its index.
    pub fn save(store: &DocumentStore, index: &InvertedIndex) -> Snapshot {
        Snapshot {
            indexes: index.clone(),
            data: store.entries().clone(),
            routes_resolved: false,
        }
    }

    /// Records whether relative routes were expanded before the capture.
    pub fn with_routes_resolved(mut self, routes_resolved: bool) -> Snapshot {
        self.routes_resolved = routes_resolved;
        self
    }

    pub fn routes_resolved(&self) -> bool {
        self.routes_resolved
    }

    /// Restores the store and index captured by [Snapshot::save].
    pub fn load(self) -> (DocumentStore, InvertedIndex) {
        (DocumentStore::from_entries(self.data), self.indexes)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn indexes(&self) -> &InvertedIndex {
        &self.indexes
    }

    pub fn data(&self) -> &IndexMap<DocumentKey, Document> {
        &self.data
    }

    /// Encodes the snapshot as pretty printed JSON.
    pub fn encode(&self) -> FlatDbResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            log::error!("Failed to encode cache snapshot: {}", err);
            FlatDbError::new_with_cause(
                "Failed to encode cache snapshot",
                ErrorKind::EncodingError,
                err.into(),
            )
        })
    }

    /// Decodes a snapshot written by [Snapshot::encode].
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::CorruptCache] when the text is not a JSON
    /// object, lacks one of the `indexes`/`data` sections or does not match
    /// their layout.
    pub fn decode(text: &str) -> FlatDbResult<Snapshot> {
        let root = match serde_json::from_str::<Value>(text) {
            Ok(Value::Document(root)) => root,
            Ok(_) => {
                log::warn!("Cache snapshot is not a JSON object");
                return Err(FlatDbError::new(
                    "Cache snapshot is not a JSON object",
                    ErrorKind::CorruptCache,
                ));
            }
            Err(err) => {
                log::warn!("Cache snapshot is not valid JSON: {}", err);
                return Err(FlatDbError::new_with_cause(
                    "Cache snapshot is not valid JSON",
                    ErrorKind::CorruptCache,
                    err.into(),
                ));
            }
        };

        for section in [SNAPSHOT_INDEXES_KEY, SNAPSHOT_DATA_KEY] {
            if !root.contains_key(section) {
                log::warn!("Cache snapshot has no {} section", section);
                return Err(FlatDbError::new(
                    &format!("Cache snapshot has no {} section", section),
                    ErrorKind::CorruptCache,
                ));
            }
        }

        serde_json::from_str::<Snapshot>(text).map_err(|err| {
            log::warn!("Cache snapshot has an unexpected layout: {}", err);
            FlatDbError::new_with_cause(
                "Cache snapshot has an unexpected layout",
                ErrorKind::CorruptCache,
                err.into(),
            )
        })
    }
}
