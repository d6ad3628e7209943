use minigql_types::RecordKey;

use crate::error::StoreResult;
use crate::record::Record;

/// Ordered, append-only store of records.
///
/// All implementations must satisfy these invariants:
/// - Keys are unique. `insert` of a key already present fails with
///   [`StoreError::DuplicateKey`](crate::StoreError::DuplicateKey).
/// - `list` returns records in insertion order.
/// - `create` assigns a key larger than any numeric key the store has held.
/// - Concurrent readers and writers are safe.
pub trait RecordStore<R: Record>: Send + Sync {
    /// First record whose key equals `key`.
    ///
    /// Returns `Ok(None)` if there is no such record. Absence is not an error.
    fn get(&self, key: &RecordKey) -> StoreResult<Option<R>>;

    /// Every record, in insertion order.
    fn list(&self) -> StoreResult<Vec<R>>;

    /// Append a record that already carries its key.
    fn insert(&self, record: R) -> StoreResult<R>;

    /// Assign the next key to `draft`, append it, and return the stored record.
    fn create(&self, draft: R) -> StoreResult<R>;

    /// First record matching `predicate`, in insertion order.
    fn find(&self, predicate: &dyn Fn(&R) -> bool) -> StoreResult<Option<R>>;

    /// Number of records currently held.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    /// Returns `true` if the store holds no records.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Insert several records, stopping at the first failure.
    fn insert_batch(&self, records: Vec<R>) -> StoreResult<usize> {
        let count = records.len();
        for record in records {
            self.insert(record)?;
        }
        Ok(count)
    }
}
