use crate::collection::Document;

/// Outcome of a successful query.
///
/// A query collapsed by `_limit: 1` or an identity lookup yields
/// [QueryResult::One]; anything else yields an ordered, never empty,
/// [QueryResult::Many].
#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult {
    One(Document),
    Many(Vec<Document>),
}

impl QueryResult {
    pub fn len(&self) -> usize {
        match self {
            QueryResult::One(_) => 1,
            QueryResult::Many(documents) => documents.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_one(&self) -> bool {
        matches!(self, QueryResult::One(_))
    }

    /// The single document, or the first of the sequence.
    pub fn first(&self) -> Option<&Document> {
        match self {
            QueryResult::One(document) => Some(document),
            QueryResult::Many(documents) => documents.first(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        match self {
            QueryResult::One(document) => std::slice::from_ref(document).iter(),
            QueryResult::Many(documents) => documents.iter(),
        }
    }

    pub fn into_vec(self) -> Vec<Document> {
        match self {
            QueryResult::One(document) => vec![document],
            QueryResult::Many(documents) => documents,
        }
    }

    /// The single document, or the first of the sequence.
    pub fn into_one(self) -> Option<Document> {
        match self {
            QueryResult::One(document) => Some(document),
            QueryResult::Many(documents) => documents.into_iter().next(),
        }
    }
}

impl IntoIterator for QueryResult {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
