use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use minigql_types::RecordKey;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::traits::RecordStore;

struct Inner<R> {
    records: Vec<R>,
    /// Next key handed out by `create`. Never decreases.
    next_seq: i64,
}

impl<R: Record> Inner<R> {
    fn contains(&self, key: &RecordKey) -> bool {
        self.records.iter().any(|r| &r.key() == key)
    }

    fn push(&mut self, record: R) -> StoreResult<R> {
        let key = record.key();
        if self.contains(&key) {
            return Err(StoreError::DuplicateKey(key));
        }
        if let Some(n) = key.as_number() {
            self.next_seq = self.next_seq.max(n.saturating_add(1));
        }
        self.records.push(record.clone());
        Ok(record)
    }
}

/// In-memory, `Vec`-backed record store.
///
/// Records are held behind a `RwLock` so one store can be shared across
/// request tasks. Records are cloned on read.
pub struct InMemoryRecordStore<R> {
    inner: RwLock<Inner<R>>,
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Create a new empty store. The first created record gets key 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                next_seq: 1,
            }),
        }
    }

    /// Create a store holding `records`, in order.
    pub fn with_records(records: Vec<R>) -> StoreResult<Self> {
        let store = Self::new();
        store.insert_batch(records)?;
        Ok(store)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner<R>>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner<R>>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    fn get(&self, key: &RecordKey) -> StoreResult<Option<R>> {
        let inner = self.read()?;
        Ok(inner.records.iter().find(|r| &r.key() == key).cloned())
    }

    fn list(&self) -> StoreResult<Vec<R>> {
        Ok(self.read()?.records.clone())
    }

    fn insert(&self, record: R) -> StoreResult<R> {
        self.write()?.push(record)
    }

    fn create(&self, mut draft: R) -> StoreResult<R> {
        let mut inner = self.write()?;
        draft.assign_key(inner.next_seq);
        let record = inner.push(draft)?;
        tracing::debug!(collection = R::COLLECTION, key = %record.key(), "record created");
        Ok(record)
    }

    fn find(&self, predicate: &dyn Fn(&R) -> bool) -> StoreResult<Option<R>> {
        let inner = self.read()?;
        Ok(inner.records.iter().find(|r| predicate(r)).cloned())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.records.len())
    }
}

impl<R: Record> std::fmt::Debug for InMemoryRecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryRecordStore")
            .field("collection", &R::COLLECTION)
            .field("record_count", &count)
            .finish()
    }
}
