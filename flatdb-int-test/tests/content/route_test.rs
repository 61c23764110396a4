use flatdb::common::Value;
use flatdb::doc;
use flatdb::errors::ErrorKind;
use flatdb::query::Query;
use flatdb_int_test::test_util::{cleanup, create_site_context, create_test_context, run_test};
use std::fs;

#[test]
fn test_relative_routes_expanded() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&["type", "collection"])?;

            assert_eq!(db.get("pages", "home")?.get_str("route"), Some("/"));
            assert_eq!(db.get("collections", "blog")?.get_str("route"), Some("/blog"));
            assert_eq!(db.get("posts", "hello")?.get_str("route"), Some("/blog/hello"));
            assert_eq!(db.get("collections", "archive")?.get_str("route"), Some("/blog/archive"));
            assert_eq!(db.get("posts", "old")?.get_str("route"), Some("/blog/old"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_reflects_resolved_routes() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&["type", "route"])?;

            let result = db.query(&Query::new().filter("route", "/blog/hello"))?;
            assert_eq!(result.first().and_then(|doc| doc.id()), Some("hello".to_string()));

            let err = db.query(&Query::new().filter("route", "./hello")).err();
            assert!(err.is_some_and(|e| e.is_not_found()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_placeholders_interpolated() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! { "type": "collections", "id": "blog", "route": "/blog" },
                doc! {
                    "type": "posts",
                    "id": "hi",
                    "collection": "blog",
                    "title": "Hi",
                    "slug": "{{title}}-page",
                    "other": "{{unknown}}-page",
                    "route": "./{{title}}",
                },
            ])?;
            let db = ctx.open(&["slug"])?;

            let post = db.get("posts", "hi")?;
            assert_eq!(post.get_str("slug"), Some("Hi-page"));
            assert_eq!(post.get_str("other"), Some("{{unknown}}-page"));
            assert_eq!(post.get_str("route"), Some("/blog/Hi"));

            let result = db.query(&Query::new().filter("slug", "Hi-page"))?;
            assert_eq!(result.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_placeholders_with_empty_field_name() {
    run_test(
        create_test_context,
        |ctx| {
            fs::write(
                ctx.source_path(),
                "---\n{\"type\":\"pages\",\"id\":\"a\",\"slug\":\"x\",\"route\":\"/p/{{slug}}\",\"\":\"1\"}\n...\n",
            )?;
            let db = ctx.open(&["type"])?;

            let page = db.get("pages", "a")?;
            assert_eq!(page.get_str("route"), Some("/p/x"));
            assert_eq!(page.get_str(""), Some("1"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sequence_and_map_routes() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! {
                    "type": "collections",
                    "id": "blog",
                    "route": { en: "/blog", de: "/blog-de", fr: "/blog-fr" },
                },
                doc! {
                    "type": "posts",
                    "id": "post",
                    "collection": "blog",
                    "route": { de: "./beitrag", en: "./post" },
                },
                doc! { "type": "collections", "id": "docs", "route": "/docs" },
                doc! {
                    "type": "pages",
                    "id": "multi",
                    "collection": "docs",
                    "route": ["./a", "/absolute"],
                },
            ])?;
            let db = ctx.open(&["type"])?;

            let post = db.get("posts", "post")?;
            let expected = doc! { de: "/blog-de/beitrag", en: "/blog/post" };
            assert_eq!(post.get("route"), Some(&Value::Document(expected)));

            let multi = db.get("pages", "multi")?;
            assert_eq!(
                multi.get("route"),
                Some(&Value::from_vec(vec!["/docs/a", "/absolute"]))
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_route_cycle_reported() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! { "type": "collections", "id": "a", "collection": "b", "route": "./a" },
                doc! { "type": "collections", "id": "b", "collection": "a", "route": "./b" },
            ])?;
            let db = ctx.open(&["type"])?;

            let issues = db.load_report().issues();
            assert!(issues.iter().any(|issue| issue.kind() == &ErrorKind::CycleDetected));
            assert_eq!(db.get("collections", "a")?.get_str("route"), Some("./a"));
            Ok(())
        },
        cleanup,
    )
}
