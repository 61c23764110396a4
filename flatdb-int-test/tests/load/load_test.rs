use flatdb::doc;
use flatdb::errors::ErrorKind;
use flatdb::query::by_type;
use flatdb::source::{FileSource, MemorySource};
use flatdb::store::DocumentKey;
use flatdb::FlatDb;
use flatdb_int_test::test_util::{cleanup, create_site_context, create_test_context, run_test, site_documents};
use std::fs;

#[test]
fn test_load_site() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&["type", "collection"])?;
            assert_eq!(db.store().len(), site_documents().len());
            assert!(!db.load_report().used_cache());
            assert!(db.load_report().issues().is_empty());

            let keys: Vec<String> = db.store().keys().map(|key| key.to_string()).collect();
            assert_eq!(keys[0], "pages.home");
            assert_eq!(keys[2], "posts.hello");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_identity_keeps_last() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! { "type": "posts", "id": "a", "title": "first" },
                doc! { "type": "posts", "id": "b", "title": "other" },
                doc! { "type": "posts", "id": "a", "title": "second" },
            ])?;
            let db = ctx.open(&["type"])?;

            assert_eq!(db.store().len(), 2);
            assert_eq!(db.get("posts", "a")?.get_str("title"), Some("second"));

            let all = db.query(&by_type("posts"))?;
            assert_eq!(all.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_documents_without_identity_get_positions() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_documents(&[
                doc! { "title": "loose" },
                doc! { "type": "posts", "id": "a" },
                doc! { "title": "another" },
            ])?;
            let db = ctx.open(&["title"])?;

            assert_eq!(db.store().len(), 3);
            assert!(db.store().contains(&DocumentKey::Position(0)));
            assert!(db.store().contains(&DocumentKey::Position(1)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unparseable_chunk_skipped() {
    run_test(
        create_test_context,
        |ctx| {
            let text = "---\n{\"type\": \"posts\", \"id\": \"a\"}\n...\n---\nnot a document\n...\n\n...\n{\"type\": \"posts\", \"id\": \"b\"}\n";
            fs::write(ctx.source_path(), text)?;

            let db = ctx.open(&["type"])?;
            assert_eq!(db.store().len(), 2);
            assert!(db.get("posts", "b").is_ok());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_source_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let source = FileSource::new(ctx.dir().join("missing.db"));
            let err = FlatDb::builder().open(&source).err();
            assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::FileNotFound));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_route_issues_do_not_abort_load() {
    run_test(
        create_test_context,
        |ctx| {
            let mut documents = site_documents();
            documents.push(doc! { "type": "posts", "id": "orphan", "collection": "nowhere", "route": "./orphan" });
            documents.push(doc! { "type": "posts", "id": "lost", "route": "./lost" });
            ctx.write_documents(&documents)?;

            let db = ctx.open(&["type", "collection"])?;
            let kinds: Vec<ErrorKind> = db
                .load_report()
                .issues()
                .iter()
                .map(|issue| issue.kind().clone())
                .collect();
            assert_eq!(kinds.len(), 2);
            assert!(kinds.contains(&ErrorKind::ParentMissing));
            assert!(kinds.contains(&ErrorKind::InvalidRoute));

            assert_eq!(db.get("posts", "orphan")?.get_str("route"), Some("./orphan"));
            assert_eq!(db.get("posts", "hello")?.get_str("route"), Some("/blog/hello"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_memory_source() {
    let db = FlatDb::builder()
        .index_field("type")
        .open(&MemorySource::new(site_documents()))
        .unwrap();
    assert!(!db.load_report().used_cache());
    assert_eq!(db.get("collections", "archive").unwrap().get_str("route"), Some("/blog/archive"));
}
