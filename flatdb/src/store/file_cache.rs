use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::common::DEFAULT_CACHE_SUFFIX;
use crate::errors::{ErrorKind, FlatDbError, FlatDbResult};
use crate::store::CacheStorageProvider;

/// Persists the cache snapshot in a hidden file next to its source.
///
/// For a source `content/site.yml` the cache lives in
/// `content/.site.yml.json` with the default suffix.
#[derive(Clone, Debug)]
pub struct FileCacheStorage {
    path: PathBuf,
}

impl FileCacheStorage {
    /// Uses an explicit cache file path.
    pub fn new<P: AsRef<Path>>(path: P) -> FileCacheStorage {
        FileCacheStorage {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Derives the cache path of a source with the default suffix.
    pub fn for_source<P: AsRef<Path>>(source: P) -> FileCacheStorage {
        Self::for_source_with_suffix(source, DEFAULT_CACHE_SUFFIX)
    }

    pub fn for_source_with_suffix<P: AsRef<Path>>(source: P, suffix: &str) -> FileCacheStorage {
        let source = source.as_ref();
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_name = format!(".{}{}", name.trim_start_matches('.'), suffix);

        let path = match source.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        };
        FileCacheStorage { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStorageProvider for FileCacheStorage {
    fn marker(&self) -> FlatDbResult<Option<DateTime<Utc>>> {
        modified_marker(&self.path)
    }

    fn read(&self) -> FlatDbResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                log::error!("Failed to read cache {}: {}", self.path.display(), err);
                Err(err.into())
            }
        }
    }

    fn write(&self, text: &str) -> FlatDbResult<()> {
        fs::write(&self.path, text).map_err(|err| {
            log::error!("Failed to write cache {}: {}", self.path.display(), err);
            FlatDbError::new_with_cause(
                &format!("Failed to write cache {}", self.path.display()),
                ErrorKind::IOError,
                err.into(),
            )
        })
    }
}

/// Modification time of a file, `None` if the file does not exist.
pub(crate) fn modified_marker(path: &Path) -> FlatDbResult<Option<DateTime<Utc>>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(DateTime::<Utc>::from(metadata.modified()?))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
