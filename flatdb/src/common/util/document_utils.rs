use crate::{
    collection::Document,
    errors::{ErrorKind, FlatDbError, FlatDbResult},
    Value, INTERNAL_PREFIX,
};

/// Decodes one JSON object into a [Document], keeping field order.
pub fn document_from_json(json: &str) -> FlatDbResult<Document> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Document(doc)) => Ok(doc),
        Ok(other) => {
            log::error!("Expected a JSON object but found {}", other);
            Err(FlatDbError::new(
                "Expected a JSON object at the document root",
                ErrorKind::ParseError,
            ))
        }
        Err(err) => Err(FlatDbError::new_with_cause(
            "Failed to parse JSON document",
            ErrorKind::ParseError,
            err.into(),
        )),
    }
}

/// Returns `true` if the field belongs to the internal visibility tiers
/// (`_name` or `__name__`).
#[inline]
pub fn is_internal_field(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}

/// Returns a copy of the document without its internal fields.
pub fn strip_internal(document: &Document) -> Document {
    document
        .iter()
        .filter(|(key, _)| !is_internal_field(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
