use flatdb::collection::Document;
use flatdb::doc;
use flatdb::errors::FlatDbResult;
use flatdb::source::FileSource;
use flatdb::store::FileCacheStorage;
use flatdb::{FlatDb, FlatDbBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use std::{env, thread};

/// Runs a test between its set up and clean up steps.
///
/// The clean up runs even when the test fails or panics; the failure is
/// reported afterwards.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> FlatDbResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> FlatDbResult<TestContext>,
    A: Fn(TestContext) -> FlatDbResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_ctx = ctx.clone();
    let result = std::panic::catch_unwind(move || test(test_ctx));

    if let Err(e) = after(ctx) {
        eprintln!("Warning: clean up failed: {:?}", e);
    }

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

#[derive(Clone)]
pub struct TestContext {
    dir: PathBuf,
}

impl TestContext {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The content file every test writes its documents to.
    pub fn source_path(&self) -> PathBuf {
        self.dir.join("site.db")
    }

    pub fn source(&self) -> FileSource {
        FileSource::new(self.source_path())
    }

    /// The hidden cache file a [FileSource] persists its snapshot to.
    pub fn cache_path(&self) -> PathBuf {
        FileCacheStorage::for_source(self.source_path())
            .path()
            .to_path_buf()
    }

    pub fn write_documents(&self, documents: &[Document]) -> FlatDbResult<()> {
        write_documents(&self.source_path(), documents)
    }

    /// Opens the content file with `fields` indexed and the default cache.
    pub fn open(&self, fields: &[&str]) -> FlatDbResult<FlatDb> {
        self.builder(fields).open(&self.source())
    }

    pub fn builder(&self, fields: &[&str]) -> FlatDbBuilder {
        FlatDb::builder().index_fields(fields)
    }

    /// Pushes the modification time of the content file into the future so
    /// that every existing cache is older than its source.
    pub fn touch_source(&self) -> FlatDbResult<()> {
        let file = fs::File::options().write(true).open(self.source_path())?;
        file.set_modified(SystemTime::now() + Duration::from_secs(60))?;
        Ok(())
    }
}

pub fn random_dir() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("flatdb-{}", id))
}

pub fn create_test_context() -> FlatDbResult<TestContext> {
    let dir = random_dir();
    fs::create_dir_all(&dir)?;
    Ok(TestContext::new(dir))
}

/// Creates a context whose content file already holds [site_documents].
pub fn create_site_context() -> FlatDbResult<TestContext> {
    let ctx = create_test_context()?;
    ctx.write_documents(&site_documents())?;
    Ok(ctx)
}

pub fn cleanup(ctx: TestContext) -> FlatDbResult<()> {
    let max_retries = 5;
    for retry in 0..max_retries {
        if !ctx.dir().exists() {
            return Ok(());
        }
        match fs::remove_dir_all(ctx.dir()) {
            Ok(()) => return Ok(()),
            Err(e) if retry + 1 < max_retries => {
                eprintln!("Retrying removal of {}: {}", ctx.dir().display(), e);
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Writes documents in the multi-document layout read by [FileSource].
pub fn write_documents(path: &Path, documents: &[Document]) -> FlatDbResult<()> {
    let text: String = documents
        .iter()
        .map(|document| format!("---\n{}\n...\n", document))
        .collect();
    fs::write(path, text)?;
    Ok(())
}

/// A small blog: a root page, a blog collection with two posts and a
/// nested archive collection.
pub fn site_documents() -> Vec<Document> {
    vec![
        doc! { "type": "pages", "id": "home", "title": "Home", "route": "/" },
        doc! {
            "type": "collections",
            "id": "blog",
            "title": "Blog",
            "route": "/blog",
        },
        doc! {
            "type": "posts",
            "id": "hello",
            "collection": "blog",
            "title": "Hello",
            "slug": "{{title}}-world",
            "route": "./hello",
            "order": 2,
            "tags": ["intro", "news"],
        },
        doc! {
            "type": "posts",
            "id": "second",
            "collection": "blog",
            "navigationTitle": "Second post",
            "route": "./second",
            "order": 1,
            "_author": "ann",
            "__secret__": "hidden",
            "tags": "news",
        },
        doc! {
            "type": "collections",
            "id": "archive",
            "collection": "blog",
            "title": "Archive",
            "route": "./archive",
        },
        doc! {
            "type": "posts",
            "id": "old",
            "collection": "archive",
            "title": "Old",
            "route": "../old",
        },
    ]
}
