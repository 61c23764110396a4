use indexmap::map::{Iter, Keys};
use indexmap::IndexMap;

use crate::common::{Value, COMPOSITE_KEY_SEPARATOR, ID_FIELD, TYPE_FIELD};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use std::fmt::{Debug, Display, Formatter};

/// Represents a document in the store.
///
/// A document is an insertion-ordered mapping from field names to [Value]s,
/// exactly as the source declared it. Two fields carry the entity identity:
///
/// * `id` - the identifier, unique per `type`
/// * `type` - the entity type
///
/// A document that declares both is addressed by its composite key
/// `type.id` (see [Document::composite_key]); a document that declares
/// neither is addressed by its position in the source.
///
/// Field names may use three visibility tiers carrying the same meaning:
/// `name` (public), `_name` (internal, kept by metadata-bearing queries) and
/// `__name__` (internal, never surfaced).
#[derive(Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of fields.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with the specified key.
    ///
    /// An existing key keeps its position and gets the new value, a new key is
    /// appended at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("title", "Blog")?;
    /// doc.put("order", 2)?;
    /// assert_eq!(doc.size(), 2);
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: impl Into<String>, value: T) -> FlatDbResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(FlatDbError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        self.data.insert(key, value.into());
        Ok(())
    }

    /// Returns the value of a top-level field, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Returns the value of a field if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Returns `true` if the field is present and not null.
    pub fn has(&self, key: &str) -> bool {
        matches!(self.data.get(key), Some(value) if !value.is_null())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Removes a field, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    /// Keeps only the fields for which the predicate returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.data.retain(|key, value| keep(key, value));
    }

    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.data.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Returns the identity text of the `id` field.
    pub fn id(&self) -> Option<String> {
        self.data.get(ID_FIELD).and_then(|v| v.identity_text())
    }

    /// Returns the identity text of the `type` field.
    pub fn doc_type(&self) -> Option<String> {
        self.data.get(TYPE_FIELD).and_then(|v| v.identity_text())
    }

    /// Returns `type.id` when the document declares both identity fields.
    pub fn composite_key(&self) -> Option<String> {
        match (self.doc_type(), self.id()) {
            (Some(doc_type), Some(id)) => Some(composite_key(&doc_type, &id)),
            _ => None,
        }
    }
}

/// Builds the primary key of an identity-bearing document.
#[inline]
pub fn composite_key(doc_type: &str, id: &str) -> String {
    format!("{}{}{}", doc_type, COMPOSITE_KEY_SEPARATOR, id)
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Strips the quotes `stringify!` leaves around string literal keys.
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] from key-value pairs.
///
/// Keys may be identifiers or string literals; values may be expressions,
/// nested `{ ... }` documents or `[ ... ]` arrays. Negative numbers and other
/// multi-token expressions need parentheses.
///
/// ```rust,ignore
/// let post = doc! {
///     "type": "posts",
///     "id": "hello",
///     "route": "./hello",
///     "collection": "blog",
///     tags: ["intro", "news"],
///     meta: { order: 1 },
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
