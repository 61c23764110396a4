use flatdb::common::SortOrder;
use flatdb::doc;
use flatdb::errors::ErrorKind;
use flatdb::query::{by_type, QueryResult};
use flatdb_int_test::test_util::{cleanup, create_test_context, run_test, TestContext};

fn orders(result: &QueryResult) -> Vec<Option<i64>> {
    result
        .iter()
        .map(|document| document.get("order").and_then(|order| order.as_i64()))
        .collect()
}

fn write_items(ctx: &TestContext) -> flatdb::errors::FlatDbResult<()> {
    ctx.write_documents(&[
        doc! { "type": "items", "id": "a", "order": 2 },
        doc! { "type": "items", "id": "b" },
        doc! { "type": "items", "id": "c", "order": 1 },
    ])
}

#[test]
fn test_missing_order_sorts_last_ascending() {
    run_test(
        create_test_context,
        |ctx| {
            write_items(&ctx)?;
            let db = ctx.open(&["type"])?;

            let result = db.query(&by_type("items"))?;
            assert_eq!(orders(&result), vec![Some(1), Some(2), None]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_descending_reverses_whole_sequence() {
    run_test(
        create_test_context,
        |ctx| {
            write_items(&ctx)?;
            let db = ctx.open(&["type"])?;

            let result = db.query(&by_type("items").sort_by("order", SortOrder::Descending))?;
            assert_eq!(orders(&result), vec![None, Some(2), Some(1)]);

            let result = db.query_document(&doc! { "type": "items", "_orderby": "order DESC" })?;
            assert_eq!(orders(&result), vec![None, Some(2), Some(1)]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_limit_applies_after_ordering() {
    run_test(
        create_test_context,
        |ctx| {
            write_items(&ctx)?;
            let db = ctx.open(&["type"])?;

            let result = db.query(&by_type("items").limit(2))?;
            assert_eq!(orders(&result), vec![Some(1), Some(2)]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_limit_above_one_truncates() {
    run_test(
        create_test_context,
        |ctx| {
            write_items(&ctx)?;
            let db = ctx.open(&["type"])?;

            let result = db.query_document(&doc! { "type": "items", "_limit": 2, "_offset": 1 })?;
            assert!(!result.is_one());
            assert_eq!(orders(&result), vec![Some(1), Some(2)]);

            let result = db.query_document(&doc! {
                "type": "items",
                "_limit": "2",
                "_orderby": "order DESC",
            })?;
            assert_eq!(orders(&result), vec![None, Some(2)]);

            // more than the matches
            let result = db.query(&by_type("items").limit(10))?;
            assert_eq!(result.len(), 3);

            // zero means no limit
            let result = db.query_document(&doc! { "type": "items", "_limit": 0 })?;
            assert_eq!(orders(&result), vec![Some(1), Some(2), None]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_order_by_internal_tier() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! { "type": "items", "id": "a", "_rank": "b" },
                doc! { "type": "items", "id": "b", "__rank__": "a" },
                doc! { "type": "items", "id": "c", "rank": "c" },
            ])?;
            let db = ctx.open(&["type"])?;

            let result = db.query(&by_type("items").sort_by("rank", SortOrder::Ascending))?;
            let ids: Vec<String> = result.iter().filter_map(|doc| doc.id()).collect();
            assert_eq!(ids, vec!["b", "a", "c"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_direction_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            write_items(&ctx)?;
            let db = ctx.open(&["type"])?;

            let err = db
                .query_document(&doc! { "type": "items", "_orderby": "order SIDEWAYS" })
                .err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::InvalidQuery));
            Ok(())
        },
        cleanup,
    )
}
