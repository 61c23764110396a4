use regex::Regex;
use std::sync::OnceLock;

use crate::collection::Document;
use crate::common::{Value, ID_FIELD, TYPE_FIELD};

static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();

fn placeholder_pattern() -> Option<&'static Regex> {
    PLACEHOLDER
        .get_or_init(|| match Regex::new(r"\{\{([^{}]+)\}\}") {
            Ok(regex) => Some(regex),
            Err(err) => {
                log::error!("Invalid placeholder pattern: {}", err);
                None
            }
        })
        .as_ref()
}

/// Replaces `{{field}}` placeholders with values of the same document.
///
/// Every top-level string, and every string element of a top-level
/// sequence, is searched for its first placeholder. When the named field
/// holds a scalar, all occurrences of that placeholder are replaced with its
/// canonical text; other placeholders in the same string stay untouched.
/// Referenced values are read from `document` as given, never from partially
/// interpolated fields. `id` and `type` are never rewritten.
///
/// Returns `None` when nothing changed.
pub fn interpolate_placeholders(document: &Document) -> Option<Document> {
    let mut changed = false;
    let interpolated: Document = document
        .iter()
        .map(|(key, value)| {
            if key == ID_FIELD || key == TYPE_FIELD {
                return (key.clone(), value.clone());
            }
            match interpolate_value(value, document) {
                Some(value) => {
                    changed = true;
                    (key.clone(), value)
                }
                None => (key.clone(), value.clone()),
            }
        })
        .collect();

    if changed {
        Some(interpolated)
    } else {
        None
    }
}

fn interpolate_value(value: &Value, source: &Document) -> Option<Value> {
    match value {
        Value::String(text) => interpolate_text(text, source).map(Value::String),
        Value::Array(elements) => {
            let mut changed = false;
            let elements = elements
                .iter()
                .map(|element| match element {
                    Value::String(text) => match interpolate_text(text, source) {
                        Some(text) => {
                            changed = true;
                            Value::String(text)
                        }
                        None => element.clone(),
                    },
                    other => other.clone(),
                })
                .collect();
            if changed {
                Some(Value::Array(elements))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Interpolates the first placeholder of a text, `None` if it stays as is.
pub fn interpolate_text(text: &str, source: &Document) -> Option<String> {
    let captures = placeholder_pattern()?.captures(text)?;
    let placeholder = captures.get(0)?.as_str();
    let field = captures.get(1)?.as_str().trim();

    let replacement = source
        .get(field)
        .filter(|value| value.is_scalar())
        .and_then(|value| value.canonical_text())?;

    Some(text.replace(placeholder, &replacement))
}
