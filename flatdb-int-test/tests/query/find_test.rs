use flatdb::common::Value;
use flatdb::doc;
use flatdb::errors::ErrorKind;
use flatdb::query::{by_identity, by_type, Query, QueryResult};
use flatdb_int_test::test_util::{cleanup, create_site_context, create_test_context, run_test};

const FIELDS: [&str; 5] = ["type", "collection", "tags", "author", "secret"];

fn ids(result: &QueryResult) -> Vec<String> {
    result.iter().filter_map(|document| document.id()).collect()
}

#[test]
fn test_find_by_single_field() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;
            let result = db.query(&by_type("collections"))?;
            assert_eq!(result.len(), 2);
            assert!(!result.is_one());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_by_identity_returns_one() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;
            let result = db.query(&by_identity("posts", "hello"))?;
            assert!(result.is_one());
            assert_eq!(result.first().and_then(|doc| doc.get_str("title")), Some("Hello"));

            let err = db.query(&Query::new().filter("id", "hello")).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::InvalidQuery));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_tiers_collapse_to_bare_name() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;

            // stored as `_author`
            let result = db.query(&Query::new().filter("author", "ann"))?;
            assert_eq!(ids(&result), vec!["second"]);

            // stored as `__secret__`
            let result = db.query(&Query::new().filter("secret", "hidden"))?;
            assert_eq!(ids(&result), vec!["second"]);
            let second = result.into_vec().remove(0);
            assert!(!second.has("__secret__"));
            assert!(!second.has("_author"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sequence_values_indexed_per_element() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;
            let result = db.query(&Query::new().filter("tags", "news"))?;
            assert_eq!(ids(&result), vec!["second", "hello"]);

            let result = db.query(&Query::new().filter("tags", "intro"))?;
            assert_eq!(ids(&result), vec!["hello"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_multiple_filters_intersect() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;

            let result = db.query(&by_type("posts").filter("collection", "blog"))?;
            assert_eq!(ids(&result), vec!["second", "hello"]);

            let result = db.query(&by_type("posts").filter("collection", "archive"))?;
            assert_eq!(ids(&result), vec!["old"]);

            let err = db
                .query(&by_type("collections").filter("tags", "news"))
                .err();
            assert!(err.is_some_and(|e| e.is_not_found()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_no_match_is_not_found() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;
            let err = db.query(&by_type("comments")).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::NotFound));

            let err = db.query(&Query::new().filter("unindexed", "x")).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::NotFound));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_scalar_filters_match_canonical_text() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! { "type": "items", "id": "a", "count": 2, "draft": true },
                doc! { "type": "items", "id": "b", "count": "2", "draft": false },
            ])?;
            let db = ctx.open(&["count", "draft"])?;

            let result = db.query(&Query::new().filter("count", 2))?;
            assert_eq!(result.len(), 2);

            let result = db.query(&Query::new().filter("draft", true))?;
            assert_eq!(ids(&result), vec!["a"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_limit_and_control_keys() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;

            let result = db.query(&by_type("posts").limit(1))?;
            assert!(result.is_one());

            let result = db.query(&by_type("posts").limit(2))?;
            assert_eq!(result.len(), 2);

            let result = db.query_document(&doc! {
                "type": "posts",
                "_limit": "2",
                "_offset": 1,
                "_orderby": "order DESC",
            })?;
            assert_eq!(result.len(), 2);

            let err = db.query_document(&doc! { "type": "posts", "_limit": "many" }).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::InvalidQuery));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_filters() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;

            let err = db.query(&Query::new()).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::InvalidQuery));

            let err = db
                .query(&Query::new().filter("tags", Value::from_vec(vec!["news"])))
                .err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::InvalidQuery));
            Ok(())
        },
        cleanup,
    )
}
