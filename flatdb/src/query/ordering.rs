use std::cmp::Ordering;

use crate::collection::Document;
use crate::common::{SortOrder, Value};
use crate::index::tiered_value;

/// Compares two values of the ordering field.
///
/// `None` and null stand for a missing field. A missing side opposite a
/// number `v` is compared as `v + 1`, opposite a string as the string with
/// its first character incremented, and after any other present value, so
/// it always lands behind what it is compared with. Sequences compare equal
/// to everything.
///
/// Present values compare numbers numerically, strings by code point and
/// booleans `false < true`. Across kinds booleans come first, then numbers,
/// then strings, then documents.
///
/// The relation is not transitive once sequences are involved, which is why
/// [sort_by_field] uses its own merge sort.
pub fn compare_field_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(present)) => compare_missing(present),
        (Some(present), None) => compare_missing(present).reverse(),
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

fn compare_missing(present: &Value) -> Ordering {
    if present.is_array() {
        return Ordering::Equal;
    }
    match missing_substitute(present) {
        Some(substitute) => compare_present(&substitute, present).then(Ordering::Greater),
        None => Ordering::Greater,
    }
}

/// The value a missing field stands for when compared with `present`.
fn missing_substitute(present: &Value) -> Option<Value> {
    match present {
        Value::I64(v) => v.checked_add(1).map(Value::I64),
        Value::F64(v) => Some(Value::F64(v + 1.0)),
        Value::String(s) => {
            let mut chars = s.chars();
            let first = chars.next()?;
            let next = char::from_u32(first as u32 + 1)?;
            let mut substitute = String::with_capacity(s.len() + 1);
            substitute.push(next);
            substitute.push_str(chars.as_str());
            Some(Value::String(substitute))
        }
        _ => None,
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Array(_), _) | (_, Value::Array(_)) => Ordering::Equal,
        (Value::I64(a), Value::I64(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (a, b) if a.is_number() && b.is_number() => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (a, b) => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::I64(_) | Value::F64(_) => 2,
        Value::String(_) => 3,
        Value::Document(_) => 4,
        Value::Array(_) => 5,
    }
}

/// Orders documents by a logical field, reading it through its tiers.
///
/// The sort is stable and ascending; [SortOrder::Descending] reverses the
/// sorted sequence as a whole.
pub fn sort_by_field<'a>(
    documents: Vec<&'a Document>,
    field: &str,
    order: SortOrder,
) -> Vec<&'a Document> {
    let mut sorted = merge_sort(documents, &mut |a: &&Document, b: &&Document| {
        compare_field_values(tiered_value(a, field), tiered_value(b, field))
    });

    if order == SortOrder::Descending {
        sorted.reverse();
    }
    sorted
}

// slice::sort_by may panic when the comparator is not a total order
fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare);
    let right = merge_sort(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        if let Some(item) = next {
            merged.push(item);
        }
    }
    merged
}
