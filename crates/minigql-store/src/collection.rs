//! Persistent document collections.
//!
//! A collection is the process-external copy of the mock records. It is
//! wiped and reseeded at startup, then read once to hydrate a
//! [`RecordStore`]. Nothing touches it while requests are being served.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::traits::RecordStore;

/// A named bag of documents.
pub trait Collection<R: Record>: Send + Sync {
    /// Collection name, e.g. `tutorial`.
    fn name(&self) -> &str;

    /// Remove every document. Returns how many were removed.
    fn remove_all(&self) -> StoreResult<usize>;

    /// Append documents in order.
    fn insert_many(&self, records: &[R]) -> StoreResult<()>;

    /// Every document, in insertion order.
    fn find_all(&self) -> StoreResult<Vec<R>>;
}

/// Wipe `collection` and insert `records`.
pub fn seed<R: Record>(collection: &dyn Collection<R>, records: &[R]) -> StoreResult<usize> {
    info!(collection = collection.name(), "seeding mock data");
    let removed = collection.remove_all()?;
    debug!(collection = collection.name(), removed, "collection cleaned up");
    collection.insert_many(records)?;
    info!(collection = collection.name(), count = records.len(), "mock data added");
    Ok(records.len())
}

/// Load every document of `collection` into `store`.
pub fn hydrate<R: Record>(
    store: &dyn RecordStore<R>,
    collection: &dyn Collection<R>,
) -> StoreResult<usize> {
    let records = collection.find_all()?;
    let count = store.insert_batch(records)?;
    info!(collection = collection.name(), count, "store hydrated");
    Ok(count)
}

/// Collection held in process memory.
pub struct MemoryCollection<R> {
    name: String,
    docs: Mutex<Vec<R>>,
}

impl<R: Record> MemoryCollection<R> {
    pub fn new() -> Self {
        Self::named(R::COLLECTION)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Vec<R>>> {
        self.docs
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl<R: Record> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Collection<R> for MemoryCollection<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn remove_all(&self) -> StoreResult<usize> {
        let mut docs = self.lock()?;
        let removed = docs.len();
        docs.clear();
        Ok(removed)
    }

    fn insert_many(&self, records: &[R]) -> StoreResult<()> {
        self.lock()?.extend_from_slice(records);
        Ok(())
    }

    fn find_all(&self) -> StoreResult<Vec<R>> {
        Ok(self.lock()?.clone())
    }
}

/// Collection stored as a pretty-printed JSON array on disk.
///
/// Layout: `<data_dir>/<database>/<collection>.json`. A missing file reads
/// as an empty collection. Writes go to a temporary sibling file that is
/// then renamed over the existing one.
pub struct JsonFileCollection<R> {
    name: String,
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> JsonFileCollection<R> {
    /// Open the collection for `R` under `data_dir/database`.
    pub fn open(data_dir: &Path, database: &str) -> StoreResult<Self> {
        Self::open_named(data_dir, database, R::COLLECTION)
    }

    pub fn open_named(data_dir: &Path, database: &str, name: &str) -> StoreResult<Self> {
        let dir = data_dir.join(database);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            name: name.to_string(),
            path: dir.join(format!("{name}.json")),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<Vec<R>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&self.path)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    fn store(&self, records: &[R]) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn guard(&self) -> StoreResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl<R: Record> Collection<R> for JsonFileCollection<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn remove_all(&self) -> StoreResult<usize> {
        let _guard = self.guard()?;
        let removed = self.load()?.len();
        self.store(&[])?;
        Ok(removed)
    }

    fn insert_many(&self, records: &[R]) -> StoreResult<()> {
        let _guard = self.guard()?;
        let mut docs = self.load()?;
        docs.extend_from_slice(records);
        self.store(&docs)
    }

    fn find_all(&self) -> StoreResult<Vec<R>> {
        self.load()
    }
}

impl<R> std::fmt::Debug for JsonFileCollection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileCollection")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}
