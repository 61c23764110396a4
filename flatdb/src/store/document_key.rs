use crate::collection::composite_key;
use std::fmt::{Display, Formatter};

/// Primary key of a stored document.
///
/// A document declaring both `id` and `type` lives under its composite key
/// `type.id`; any other document lives under its position among the
/// identity-less documents of the source. Both forms serialize as strings
/// (`"posts.hello"`, `"0"`), and since a composite key always contains the
/// separator the two never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DocumentKey {
    /// `type.id` of an identity-bearing document.
    Composite(String),
    /// Ordinal of a document without identity.
    Position(usize),
}

impl DocumentKey {
    pub fn composite(doc_type: &str, id: &str) -> DocumentKey {
        DocumentKey::Composite(composite_key(doc_type, id))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, DocumentKey::Composite(_))
    }

    /// Parses the string form written by [Display].
    pub fn parse(text: &str) -> DocumentKey {
        match text.parse::<usize>() {
            Ok(position) => DocumentKey::Position(position),
            Err(_) => DocumentKey::Composite(text.to_string()),
        }
    }
}

impl Display for DocumentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKey::Composite(key) => write!(f, "{}", key),
            DocumentKey::Position(position) => write!(f, "{}", position),
        }
    }
}

impl From<String> for DocumentKey {
    fn from(value: String) -> Self {
        DocumentKey::parse(&value)
    }
}

impl From<DocumentKey> for String {
    fn from(value: DocumentKey) -> Self {
        value.to_string()
    }
}
