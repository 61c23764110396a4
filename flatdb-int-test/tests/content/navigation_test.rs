use flatdb::common::Value;
use flatdb::content::{LinkContext, RouteLinkBuilder};
use flatdb::doc;
use flatdb::errors::ErrorKind;
use flatdb::query::{by_identity, by_type};
use flatdb_int_test::test_util::{cleanup, create_site_context, create_test_context, run_test, TestContext};

const FIELDS: [&str; 2] = ["type", "collection"];

fn open_with_links(ctx: &TestContext) -> flatdb::errors::FlatDbResult<flatdb::FlatDb> {
    ctx.builder(&FIELDS)
        .link_builder(RouteLinkBuilder::new())
        .open(&ctx.source())
}

#[test]
fn test_breadcrumbs_root_first() {
    run_test(
        create_site_context,
        |ctx| {
            let db = open_with_links(&ctx)?;
            let context = LinkContext::new("/en/blog/old").with_language("en");

            let trail = db.breadcrumbs("posts", "old", &context)?;
            let texts: Vec<&str> = trail.iter().map(|link| link.text.as_str()).collect();
            assert_eq!(texts, vec!["Blog", "Archive", "Old"]);

            let hrefs: Vec<Value> = trail.iter().map(|link| link.href.clone()).collect();
            assert_eq!(
                hrefs,
                vec![
                    Value::from("/en/blog"),
                    Value::from("/en/blog/archive"),
                    Value::from("/en/blog/old"),
                ]
            );
            assert!(trail[2].current);
            assert!(!trail[0].current);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_breadcrumbs_of_missing_item_are_empty() {
    run_test(
        create_site_context,
        |ctx| {
            let db = open_with_links(&ctx)?;
            let trail = db.breadcrumbs("posts", "nope", &LinkContext::default())?;
            assert!(trail.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_breadcrumb_cycle_detected() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! { "type": "collections", "id": "a", "collection": "b", "route": "/a" },
                doc! { "type": "collections", "id": "b", "collection": "a", "route": "/b" },
            ])?;
            let db = open_with_links(&ctx)?;

            let err = db
                .breadcrumbs("collections", "a", &LinkContext::default())
                .err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::CycleDetected));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_children_grouped_by_type() {
    run_test(
        create_site_context,
        |ctx| {
            let db = open_with_links(&ctx)?;

            let children = db.children("blog", false)?;
            let types: Vec<&String> = children.keys().collect();
            assert_eq!(types, vec!["posts", "collections"]);
            assert_eq!(children["posts"].len(), 2);
            assert!(children["posts"].iter().all(|post| !post.has("_author")));

            let children = db.children("blog", true)?;
            assert!(children["posts"].iter().any(|post| post.has("_author")));

            assert!(db.children("hello", false)?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_titles() {
    run_test(
        create_site_context,
        |ctx| {
            let db = open_with_links(&ctx)?;
            assert_eq!(db.title_of(&by_identity("posts", "hello"))?, "Hello");
            assert_eq!(db.title_of(&by_identity("posts", "second"))?, "Second post");

            let err = db.title_of(&by_identity("posts", "nope")).err();
            assert!(err.is_some_and(|e| e.is_not_found()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_title() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[doc! { "type": "pages", "id": "untitled" }])?;
            let db = open_with_links(&ctx)?;
            assert_eq!(db.title_of(&by_identity("pages", "untitled"))?, "N/A");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_links_attached_to_results() {
    run_test(
        create_site_context,
        |ctx| {
            let db = open_with_links(&ctx)?;
            let context = LinkContext::new("/blog/hello");

            let result = db.query_with_context(&by_identity("posts", "hello"), false, &context)?;
            let post = result.into_one().unwrap_or_default();
            let link = post.get("link").and_then(|link| link.as_document()).cloned();
            assert_eq!(
                link,
                Some(doc! { "text": "Hello", "href": "/blog/hello", "title": "Hello", "current": true })
            );

            let links = db.link(&by_type("posts"), &context)?;
            assert_eq!(links.as_array().map(|links| links.len()), Some(3));

            let href = db.href(&by_identity("pages", "home"), &context)?;
            assert_eq!(href, Value::from("/"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_route_href() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[doc! { "type": "pages", "id": "floating", "title": "Floating" }])?;
            let db = open_with_links(&ctx)?;

            let href = db.href(&by_identity("pages", "floating"), &LinkContext::default())?;
            assert_eq!(href, Value::from("#missingroute"));

            // no route, no link
            let page = db.get("pages", "floating")?;
            assert!(!page.has("link"));
            Ok(())
        },
        cleanup,
    )
}
