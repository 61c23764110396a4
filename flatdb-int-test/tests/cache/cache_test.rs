use chrono::{Duration, Utc};
use flatdb::source::MemorySource;
use flatdb::store::{CacheStorageProvider, MemoryCacheStorage, Snapshot};
use flatdb::FlatDb;
use flatdb_int_test::test_util::{cleanup, create_site_context, run_test, site_documents};
use std::fs;

const FIELDS: [&str; 2] = ["type", "collection"];

#[test]
fn test_cache_written_next_to_source() {
    run_test(
        create_site_context,
        |ctx| {
            assert!(!ctx.cache_path().exists());
            ctx.open(&FIELDS)?;

            assert!(ctx.cache_path().exists());
            let name = ctx.cache_path().file_name().map(|name| name.to_string_lossy().to_string());
            assert_eq!(name, Some(".site.db.json".to_string()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_second_open_uses_cache() {
    run_test(
        create_site_context,
        |ctx| {
            let first = ctx.open(&FIELDS)?;
            let second = ctx.open(&FIELDS)?;

            assert!(!first.load_report().used_cache());
            assert!(second.load_report().used_cache());
            assert_eq!(first.store(), second.store());
            assert_eq!(first.index(), second.index());
            assert_eq!(second.get("posts", "old")?.get_str("route"), Some("/blog/old"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_snapshot_round_trip() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.open(&FIELDS)?;

            let text = fs::read_to_string(ctx.cache_path())?;
            let (store, index) = Snapshot::decode(&text)?.load();
            assert_eq!(&store, db.store());
            assert_eq!(&index, db.index());

            let snapshot = db.snapshot();
            assert_eq!(Snapshot::decode(&snapshot.encode()?)?, snapshot);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_stale_cache_rebuilt() {
    run_test(
        create_site_context,
        |ctx| {
            ctx.open(&FIELDS)?;

            let mut documents = site_documents();
            documents.truncate(2);
            ctx.write_documents(&documents)?;
            ctx.touch_source()?;

            let db = ctx.open(&FIELDS)?;
            assert!(!db.load_report().used_cache());
            assert_eq!(db.store().len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_corrupt_cache_falls_back_to_source() {
    run_test(
        create_site_context,
        |ctx| {
            ctx.open(&FIELDS)?;
            fs::write(ctx.cache_path(), "{\"indexes\": [")?;

            let db = ctx.open(&FIELDS)?;
            assert!(!db.load_report().used_cache());
            assert_eq!(db.store().len(), site_documents().len());

            // the rebuild replaced the damaged file
            let text = fs::read_to_string(ctx.cache_path())?;
            assert!(Snapshot::decode(&text).is_ok());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cache_missing_sections_falls_back() {
    run_test(
        create_site_context,
        |ctx| {
            ctx.open(&FIELDS)?;
            fs::write(ctx.cache_path(), "{\"data\": {}}")?;

            let db = ctx.open(&FIELDS)?;
            assert!(!db.load_report().used_cache());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cache_disabled() {
    run_test(
        create_site_context,
        |ctx| {
            let db = ctx.builder(&FIELDS).use_cache(false).open(&ctx.source())?;
            assert!(!db.load_report().used_cache());
            assert!(!ctx.cache_path().exists());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_changed_index_fields_rebuild() {
    run_test(
        create_site_context,
        |ctx| {
            ctx.open(&FIELDS)?;
            let db = ctx.open(&["type", "collection", "tags"])?;
            assert!(!db.load_report().used_cache());
            assert!(db.index().has_field("tags"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_memory_cache_storage() {
    let storage = MemoryCacheStorage::new();
    let source = MemorySource::new(site_documents()).with_marker(Utc::now() - Duration::minutes(5));

    let open = || {
        FlatDb::builder()
            .index_fields(&FIELDS)
            .cache_storage(storage.clone())
            .open(&source)
            .unwrap()
    };

    assert!(!open().load_report().used_cache());
    assert!(open().load_report().used_cache());

    storage.write_with_marker(&storage.read().unwrap().unwrap(), Utc::now() - Duration::hours(1));
    assert!(!open().load_report().used_cache());
}
