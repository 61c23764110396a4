use indexmap::IndexMap;
use std::fmt::{Display, Formatter};

use crate::collection::Document;
use crate::common::{
    SortOrder, Value, CONTROL_KEYS, DEFAULT_ORDER_FIELD, ID_FIELD, LIMIT_KEY, OFFSET_KEY,
    ORDER_BY_KEY, TYPE_FIELD,
};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};

/// The field and direction results are ordered by.
///
/// Parsed from `"<field> <ASC|DESC>"`; the direction is optional and matched
/// case-insensitively. The default is `order ASC`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy {
    field: String,
    order: SortOrder,
}

impl OrderBy {
    pub fn new(field: &str, order: SortOrder) -> OrderBy {
        OrderBy {
            field: field.to_string(),
            order,
        }
    }

    pub fn parse(text: &str) -> FlatDbResult<OrderBy> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match tokens.as_slice() {
            [field] => Ok(OrderBy::new(field, SortOrder::Ascending)),
            [field, direction] => Ok(OrderBy::new(field, SortOrder::parse(direction)?)),
            _ => {
                log::error!("Invalid {} value '{}'", ORDER_BY_KEY, text);
                Err(FlatDbError::new(
                    &format!("Invalid {} value '{}', expected '<field> <ASC|DESC>'", ORDER_BY_KEY, text),
                    ErrorKind::InvalidQuery,
                ))
            }
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        OrderBy::new(DEFAULT_ORDER_FIELD, SortOrder::Ascending)
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.order.token())
    }
}

/// A filter mapping plus the `_limit`, `_offset` and `_orderby` controls.
///
/// Every filter is an equality test against the index; a document matches
/// when it matches all of them. Filtering on `id` requires `type` as well,
/// the pair then addresses one document directly.
///
/// # Examples
///
/// ```rust,ignore
/// // fluent
/// let query = Query::new()
///     .filter("type", "posts")
///     .filter("collection", "blog")
///     .sort_by("date", SortOrder::Descending)
///     .limit(10);
///
/// // from a filter document
/// let query = Query::from_document(&doc! {
///     "type": "posts",
///     "_orderby": "date desc",
///     "_limit": 10,
/// })?;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    filters: IndexMap<String, Value>,
    limit: Option<usize>,
    offset: Option<usize>,
    order_by: OrderBy,
}

/// Creates a query addressing one document by its identity.
pub fn by_identity(doc_type: &str, id: &str) -> Query {
    Query::new().filter(TYPE_FIELD, doc_type).filter(ID_FIELD, id)
}

/// Creates a query matching every document of a type.
pub fn by_type(doc_type: &str) -> Query {
    Query::new().filter(TYPE_FIELD, doc_type)
}

impl Query {
    pub fn new() -> Query {
        Query::default()
    }

    /// Adds an equality filter; a later filter on the same field wins.
    pub fn filter<T: Into<Value>>(mut self, field: &str, value: T) -> Query {
        self.filters.insert(field.to_string(), value.into());
        self
    }

    /// Limits the number of results; `1` collapses the result to a single
    /// document and `0` removes the limit.
    pub fn limit(mut self, limit: usize) -> Query {
        self.limit = if limit == 0 { None } else { Some(limit) };
        self
    }

    pub fn offset(mut self, offset: usize) -> Query {
        self.offset = Some(offset);
        self
    }

    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Query {
        self.order_by = OrderBy::new(field, order);
        self
    }

    /// Parses a filter document, pulling out the control keys.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidQuery] when `_limit` or `_offset` is not
    /// a non-negative integer or `_orderby` is malformed.
    pub fn from_document(document: &Document) -> FlatDbResult<Query> {
        let mut query = Query::new();

        for (key, value) in document.iter() {
            match key.as_str() {
                LIMIT_KEY => {
                    query = query.limit(parse_count(LIMIT_KEY, value)?);
                }
                OFFSET_KEY => {
                    query = query.offset(parse_count(OFFSET_KEY, value)?);
                }
                ORDER_BY_KEY => match value.as_str() {
                    Some(text) => query.order_by = OrderBy::parse(text)?,
                    None => {
                        log::error!("{} must be a string but found {}", ORDER_BY_KEY, value);
                        return Err(FlatDbError::new(
                            &format!("{} must be a string", ORDER_BY_KEY),
                            ErrorKind::InvalidQuery,
                        ));
                    }
                },
                _ => {
                    query.filters.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(query)
    }

    pub fn filters(&self) -> &IndexMap<String, Value> {
        &self.filters
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Offset requested by the caller. The engine never applies it.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn order_by(&self) -> &OrderBy {
        &self.order_by
    }

    /// Returns `true` when the result collapses to a single document.
    pub fn is_single(&self) -> bool {
        self.limit == Some(1) || self.filters.contains_key(ID_FIELD)
    }

    /// Converts the query back into its filter document form.
    pub fn to_document(&self) -> Document {
        let mut document: Document = self
            .filters
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let controls: [(&str, Option<Value>); 3] = [
            (LIMIT_KEY, self.limit.map(Value::from)),
            (OFFSET_KEY, self.offset.map(Value::from)),
            (ORDER_BY_KEY, Some(Value::from(self.order_by.to_string()))),
        ];
        for (key, value) in controls {
            if let Some(value) = value {
                // control keys are never empty
                let _ = document.put(key, value);
            }
        }
        document
    }
}

impl TryFrom<&Document> for Query {
    type Error = FlatDbError;

    fn try_from(document: &Document) -> Result<Self, Self::Error> {
        Query::from_document(document)
    }
}

/// Returns `true` for `_limit`, `_offset` and `_orderby`.
pub(crate) fn is_control_key(key: &str) -> bool {
    CONTROL_KEYS.contains(&key)
}

fn parse_count(key: &str, value: &Value) -> FlatDbResult<usize> {
    let count = match value {
        Value::String(text) => text.trim().parse::<i64>().ok(),
        other => other.as_i64(),
    };

    match count {
        Some(count) if count >= 0 => Ok(count as usize),
        _ => {
            log::error!("{} must be a non-negative integer but found {}", key, value);
            Err(FlatDbError::new(
                &format!("{} must be a non-negative integer", key),
                ErrorKind::InvalidQuery,
            ))
        }
    }
}
