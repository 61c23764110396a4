use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::collection::Document;
use crate::common::{DOCUMENT_START_MARKER, DOCUMENT_TERMINATOR};
use crate::errors::FlatDbResult;
use crate::source::{json_parser, DocumentParser, DocumentSource};
use crate::store::{modified_marker, CacheStorage, FileCacheStorage};

/// A multi-document text file.
///
/// Documents are separated by a line starting with `...`; each may open with
/// a `---` line. Every chunk is handed to the configured [DocumentParser]. A
/// chunk that fails to parse is logged and skipped.
///
/// ```text
/// ---
/// {"type": "collections", "id": "blog", "route": "/blog"}
/// ...
/// ---
/// {"type": "posts", "id": "hello", "collection": "blog", "route": "./hello"}
/// ...
/// ```
#[derive(Clone)]
pub struct FileSource {
    path: PathBuf,
    parser: DocumentParser,
}

impl FileSource {
    /// A source parsing each document as JSON.
    pub fn new<P: AsRef<Path>>(path: P) -> FileSource {
        Self::with_parser(path, json_parser())
    }

    pub fn with_parser<P: AsRef<Path>>(path: P, parser: DocumentParser) -> FileSource {
        FileSource {
            path: path.as_ref().to_path_buf(),
            parser,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn marker(&self) -> FlatDbResult<Option<DateTime<Utc>>> {
        modified_marker(&self.path)
    }

    fn documents(&self) -> FlatDbResult<Vec<Document>> {
        let text = fs::read_to_string(&self.path).map_err(|err| {
            log::error!("Failed to read source {}: {}", self.path.display(), err);
            err
        })?;

        let mut documents = Vec::new();
        for chunk in split_documents(&text) {
            match (self.parser)(chunk) {
                Ok(document) => documents.push(document),
                Err(err) => {
                    log::warn!(
                        "Skipping document of {} that failed to parse: {}\n{}",
                        self.path.display(),
                        err,
                        chunk
                    );
                }
            }
        }

        log::debug!("Read {} documents from {}", documents.len(), self.path.display());
        Ok(documents)
    }

    fn default_cache_storage(&self) -> Option<CacheStorage> {
        Some(CacheStorage::new(FileCacheStorage::for_source(&self.path)))
    }
}

/// Splits a multi-document text into the bodies of its documents.
pub fn split_documents(text: &str) -> Vec<&str> {
    text.trim()
        .split(DOCUMENT_TERMINATOR)
        .map(|chunk| {
            let chunk = chunk.trim();
            chunk.strip_prefix(DOCUMENT_START_MARKER).unwrap_or(chunk).trim()
        })
        .filter(|chunk| !chunk.is_empty())
        .collect()
}
