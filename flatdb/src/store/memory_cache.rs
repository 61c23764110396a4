use chrono::{DateTime, Utc};

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::FlatDbResult;
use crate::store::CacheStorageProvider;

/// Keeps the cache snapshot in memory.
///
/// Clones share the same slot, which makes it handy for tests and for
/// processes that reload a source several times.
#[derive(Clone, Default)]
pub struct MemoryCacheStorage {
    slot: Atomic<Option<(String, DateTime<Utc>)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> MemoryCacheStorage {
        MemoryCacheStorage { slot: atomic(None) }
    }

    /// Stores text with an explicit marker, bypassing the clock.
    pub fn write_with_marker(&self, text: &str, marker: DateTime<Utc>) {
        self.slot
            .write_with(|slot| *slot = Some((text.to_string(), marker)));
    }

    pub fn clear(&self) {
        self.slot.write_with(|slot| *slot = None);
    }
}

impl CacheStorageProvider for MemoryCacheStorage {
    fn marker(&self) -> FlatDbResult<Option<DateTime<Utc>>> {
        Ok(self.slot.read_with(|slot| slot.as_ref().map(|(_, at)| *at)))
    }

    fn read(&self) -> FlatDbResult<Option<String>> {
        Ok(self.slot.read_with(|slot| slot.as_ref().map(|(text, _)| text.clone())))
    }

    fn write(&self, text: &str) -> FlatDbResult<()> {
        self.write_with_marker(text, Utc::now());
        Ok(())
    }
}
