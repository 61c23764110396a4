use crate::collection::Document;
use crate::common::{Value, PARENT_MARKER, PATH_SEPARATOR, RELATIVE_MARKER};
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};

/// Returns `true` if the route, or any of its elements, contains `./`.
pub fn is_relative(route: &Value) -> bool {
    match route {
        Value::String(route) => route.contains(RELATIVE_MARKER),
        Value::Array(routes) => routes.iter().any(is_relative_text),
        Value::Document(routes) => routes.iter().any(|(_, route)| is_relative_text(route)),
        _ => false,
    }
}

fn is_relative_text(route: &Value) -> bool {
    matches!(route, Value::String(route) if route.contains(RELATIVE_MARKER))
}

/// Expands one relative route against its parent route.
///
/// The first `../` is replaced with the parent's directory, otherwise the
/// first `./` with the parent route itself. Anything else is returned as is.
///
/// ```text
/// expand_one("/blog", "./child")          == "/blog/child"
/// expand_one("/blog/post", "../sibling")  == "/blog/sibling"
/// expand_one("/blog", "/about")           == "/about"
/// ```
pub fn expand_one(parent: &str, own: &str) -> String {
    let parent = parent.trim_end_matches(PATH_SEPARATOR);

    if own.contains(PARENT_MARKER) {
        let directory = match parent.rsplit_once(PATH_SEPARATOR) {
            Some((directory, _)) => directory,
            None => "",
        };
        own.replacen(PARENT_MARKER, &format!("{}{}", directory, PATH_SEPARATOR), 1)
    } else if own.contains(RELATIVE_MARKER) {
        own.replacen(RELATIVE_MARKER, &format!("{}{}", parent, PATH_SEPARATOR), 1)
    } else {
        own.to_string()
    }
}

/// Expands a route of any shape against a parent route of any shape.
///
/// A single string is broadcast over a sequence or a per-language map and
/// the result takes the shape of the non-string side. Two sequences (or two
/// maps) are combined element-wise over the positions (or keys) present in
/// both; the others are dropped.
///
/// # Errors
///
/// Fails with [ErrorKind::InvalidRoute] for any other combination, including
/// non-string elements.
pub fn expand_route(parent: &Value, own: &Value) -> FlatDbResult<Value> {
    match (parent, own) {
        (Value::String(parent), Value::String(own)) => Ok(Value::from(expand_one(parent, own))),

        (Value::String(parent), Value::Array(own)) => own
            .iter()
            .map(|own| route_text(own).map(|own| Value::from(expand_one(parent, own))))
            .collect::<FlatDbResult<Vec<Value>>>()
            .map(Value::Array),
        (Value::Array(parents), Value::String(own)) => parents
            .iter()
            .map(|parent| route_text(parent).map(|parent| Value::from(expand_one(parent, own))))
            .collect::<FlatDbResult<Vec<Value>>>()
            .map(Value::Array),
        (Value::Array(parents), Value::Array(own)) => parents
            .iter()
            .zip(own.iter())
            .map(|(parent, own)| Ok(Value::from(expand_one(route_text(parent)?, route_text(own)?))))
            .collect::<FlatDbResult<Vec<Value>>>()
            .map(Value::Array),

        (Value::String(parent), Value::Document(own)) => {
            expand_keyed(own, |_, own| Ok(expand_one(parent, route_text(own)?)))
        }
        (Value::Document(parents), Value::String(own)) => {
            expand_keyed(parents, |_, parent| Ok(expand_one(route_text(parent)?, own)))
        }
        (Value::Document(parents), Value::Document(own)) => {
            let shared: Document = own
                .iter()
                .filter(|(key, _)| parents.contains_key(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            expand_keyed(&shared, |key, own| {
                let parent = parents.get(key).map(route_text).transpose()?.unwrap_or_default();
                Ok(expand_one(parent, route_text(own)?))
            })
        }

        (parent, own) => {
            log::warn!("Cannot expand route {} against parent route {}", own, parent);
            Err(invalid_route(&format!(
                "Cannot expand route {} against parent route {}",
                own, parent
            )))
        }
    }
}

fn expand_keyed<F>(routes: &Document, mut expand: F) -> FlatDbResult<Value>
where
    F: FnMut(&str, &Value) -> FlatDbResult<String>,
{
    let mut expanded = Document::new();
    for (key, route) in routes.iter() {
        expanded.put(key.as_str(), expand(key.as_str(), route)?)?;
    }
    Ok(Value::Document(expanded))
}

fn route_text(route: &Value) -> FlatDbResult<&str> {
    route.as_str().ok_or_else(|| {
        log::warn!("Route element {} is not a string", route);
        invalid_route(&format!("Route element {} is not a string", route))
    })
}

fn invalid_route(message: &str) -> FlatDbError {
    FlatDbError::new(message, ErrorKind::InvalidRoute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_expand_one() {
        assert_eq!(expand_one("/blog", "./child"), "/blog/child");
        assert_eq!(expand_one("/blog/", "./child"), "/blog/child");
        assert_eq!(expand_one("/", "./child"), "/child");
        assert_eq!(expand_one("/blog/post", "../sibling"), "/blog/sibling");
        assert_eq!(expand_one("/blog", "../top"), "/top");
        assert_eq!(expand_one("/blog", "/about"), "/about");
    }

    #[test]
    fn test_only_first_marker_is_replaced() {
        assert_eq!(expand_one("/a", "./b/./c"), "/a/b/./c");
    }

    #[test]
    fn test_is_relative() {
        assert!(is_relative(&Value::from("./x")));
        assert!(is_relative(&Value::from("../x")));
        assert!(!is_relative(&Value::from("/x")));
        assert!(is_relative(&Value::from(vec!["/a", "./b"])));
        assert!(is_relative(&Value::Document(doc! { en: "./x" })));
        assert!(!is_relative(&Value::from(3)));
    }

    #[test]
    fn test_string_against_string() {
        let route = expand_route(&Value::from("/blog"), &Value::from("./child")).unwrap();
        assert_eq!(route, Value::from("/blog/child"));
    }

    #[test]
    fn test_broadcast_takes_sequence_shape() {
        let route = expand_route(&Value::from("/blog"), &Value::from(vec!["./a", "./b"])).unwrap();
        assert_eq!(route, Value::from(vec!["/blog/a", "/blog/b"]));

        let route = expand_route(&Value::from(vec!["/x", "/y"]), &Value::from("./a")).unwrap();
        assert_eq!(route, Value::from(vec!["/x/a", "/y/a"]));
    }

    #[test]
    fn test_keyed_routes() {
        let parents = Value::Document(doc! { en: "/blog", sk: "/blog-sk", de: "/blog-de" });
        let own = Value::Document(doc! { sk: "./clanok", en: "./article", fr: "./article-fr" });

        let route = expand_route(&parents, &own).unwrap();
        let route = route.as_document().unwrap();
        assert_eq!(route.size(), 2);
        assert_eq!(route.get_str("sk"), Some("/blog-sk/clanok"));
        assert_eq!(route.get_str("en"), Some("/blog/article"));

        let route = expand_route(&parents, &Value::from("./x")).unwrap();
        assert_eq!(route.as_document().and_then(|d| d.get_str("de")), Some("/blog-de/x"));

        let route = expand_route(&Value::from("/p"), &own).unwrap();
        assert_eq!(route.as_document().map(|d| d.size()), Some(3));
    }

    #[test]
    fn test_sequences_zip_over_shared_positions() {
        let route = expand_route(
            &Value::from(vec!["/a", "/b", "/c"]),
            &Value::from(vec!["./x", "./y"]),
        )
        .unwrap();
        assert_eq!(route, Value::from(vec!["/a/x", "/b/y"]));
    }

    #[test]
    fn test_invalid_shapes() {
        let cases = [
            (Value::from(1), Value::from("./x")),
            (Value::from("/a"), Value::from(true)),
            (Value::from("/a"), Value::from_vec(vec![Value::from("./x"), Value::from(2)])),
            (Value::from(vec!["/a"]), Value::Document(doc! { en: "./x" })),
        ];
        for (parent, own) in cases {
            let err = expand_route(&parent, &own).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidRoute);
        }
    }
}
