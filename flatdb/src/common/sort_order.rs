use crate::common::{ASCENDING_TOKEN, DESCENDING_TOKEN};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};

/// Specifies the direction of an ordered query result.
///
/// The direction never changes how two documents compare. Results are always
/// sorted ascending first and a [SortOrder::Descending] query reverses the
/// whole sequence afterwards, so documents missing the ordering field end up
/// last in ascending order and first in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z)
    #[default]
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A)
    Descending,
}

impl SortOrder {
    /// Parses an `ASC`/`DESC` token, ignoring ASCII case.
    pub fn parse(token: &str) -> FlatDbResult<SortOrder> {
        if token.eq_ignore_ascii_case(ASCENDING_TOKEN) {
            Ok(SortOrder::Ascending)
        } else if token.eq_ignore_ascii_case(DESCENDING_TOKEN) {
            Ok(SortOrder::Descending)
        } else {
            log::error!("Unsupported order direction {}", token);
            Err(FlatDbError::new(
                &format!("Unsupported order direction '{}', expected ASC or DESC", token),
                ErrorKind::InvalidQuery,
            ))
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            SortOrder::Ascending => ASCENDING_TOKEN,
            SortOrder::Descending => DESCENDING_TOKEN,
        }
    }
}
