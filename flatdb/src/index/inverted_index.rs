use indexmap::{IndexMap, IndexSet};

use crate::collection::Document;
use crate::common::{Value, HIDDEN_PREFIX, HIDDEN_SUFFIX, INTERNAL_PREFIX};
use crate::store::{DocumentKey, DocumentStore};

type Buckets = IndexMap<String, IndexSet<DocumentKey>>;

/// Secondary index over the configured fields of a [DocumentStore].
///
/// Maps `field -> bucket key -> ordered set of document keys`. The bucket key
/// is the canonical text of a scalar value (see [Value::canonical_text]), so
/// `2` and `2.0` share a bucket. A sequence contributes one entry per scalar
/// element; null, nested documents and nested sequences are never indexed.
///
/// All three visibility tiers of a field (`order`, `_order`, `__order__`)
/// are filed under the bare name.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    entries: IndexMap<String, Buckets>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex {
            entries: IndexMap::new(),
        }
    }

    /// Discards every entry and indexes the store again.
    ///
    /// Every configured field gets an entry, even when no document holds it.
    pub fn build(&mut self, store: &DocumentStore, index_fields: &[String]) {
        self.entries.clear();

        let fields: IndexSet<String> = index_fields
            .iter()
            .map(|field| canonical_field_name(field).to_string())
            .filter(|field| !field.is_empty())
            .collect();

        for field in &fields {
            self.entries.insert(field.clone(), Buckets::new());
        }

        for (key, document) in store.iter() {
            for field in &fields {
                for tier in tier_names(field) {
                    if let Some(value) = document.get(&tier) {
                        self.write(field, value, key);
                    }
                }
            }
        }

        log::debug!(
            "Indexed {} documents over {} fields into {} buckets",
            store.len(),
            self.entries.len(),
            self.bucket_count()
        );
    }

    fn write(&mut self, field: &str, value: &Value, key: &DocumentKey) {
        match value {
            Value::Null => {}
            Value::Array(elements) => {
                for element in elements {
                    if element.is_scalar() {
                        self.add_index_element(field, element, key);
                    }
                }
            }
            value => {
                if value.is_scalar() {
                    self.add_index_element(field, value, key);
                }
            }
        }
    }

    fn add_index_element(&mut self, field: &str, value: &Value, key: &DocumentKey) {
        if let Some(bucket_key) = value.canonical_text() {
            self.entries
                .entry(field.to_string())
                .or_default()
                .entry(bucket_key)
                .or_default()
                .insert(key.clone());
        }
    }

    /// Returns the keys filed under the canonical text of `value`.
    ///
    /// An unknown field or value yields an empty set.
    pub fn search(&self, field: &str, value: &Value) -> IndexSet<DocumentKey> {
        let field = canonical_field_name(field);
        match value.canonical_text() {
            Some(bucket_key) => self
                .entries
                .get(field)
                .and_then(|buckets| buckets.get(&bucket_key))
                .cloned()
                .unwrap_or_default(),
            None => IndexSet::new(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.entries.contains_key(canonical_field_name(field))
    }

    /// Total number of buckets over all fields.
    pub fn bucket_count(&self) -> usize {
        self.entries.values().map(|buckets| buckets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strips the visibility tier markers from a field name.
pub fn canonical_field_name(field: &str) -> &str {
    field.trim_matches('_')
}

fn tier_names(field: &str) -> [String; 3] {
    [
        field.to_string(),
        format!("{}{}", INTERNAL_PREFIX, field),
        format!("{}{}{}", HIDDEN_PREFIX, field, HIDDEN_SUFFIX),
    ]
}

/// Reads a logical field, trying `name`, then `_name`, then `__name__`.
///
/// Null values are skipped so a lower tier can still supply the value.
pub fn tiered_value<'a>(document: &'a Document, field: &str) -> Option<&'a Value> {
    let field = canonical_field_name(field);
    tier_names(field)
        .iter()
        .filter_map(|tier| document.get(tier))
        .find(|value| !value.is_null())
}
