//! A storage adapter which records performance metrics.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{
    Bytes, LockableStorageTraits, ReadableStorageTraits, StorageError, StoreKey, StoreKeyValue,
    StoreLocation, StoreLock, WritableStorageTraits,
};

/// The performance metrics storage adapter. Accumulates metrics, such as read requests and bytes written.
///
/// It is intended to aid in testing by allowing the application to validate that metrics (e.g., bytes read/written, total read/write requests) match expected values for specific operations.
///
/// ### Example
/// ```rust
/// # use std::sync::Arc;
/// # use parrs_storage::store::MemoryStore;
/// # use parrs_storage::storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter;
/// let store = Arc::new(MemoryStore::new());
/// let store = Arc::new(PerformanceMetricsStorageAdapter::new(store));
/// // do some store operations...
/// // assert_eq!(store.reads(), ...);
/// // assert_eq!(store.keys_read(), ...);
/// // assert_eq!(store.writes(), ...);
/// // assert_eq!(store.keys_erased(), ...);
/// ```
#[derive(Debug)]
pub struct PerformanceMetricsStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    bytes_read: AtomicUsize,
    bytes_written: AtomicUsize,
    reads: AtomicUsize,
    keys_read: AtomicUsize,
    writes: AtomicUsize,
    keys_erased: AtomicUsize,
}

impl<TStorage: ?Sized> PerformanceMetricsStorageAdapter<TStorage> {
    /// Create a new performance metrics storage adapter.
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self {
            storage,
            bytes_read: AtomicUsize::default(),
            bytes_written: AtomicUsize::default(),
            reads: AtomicUsize::default(),
            keys_read: AtomicUsize::default(),
            writes: AtomicUsize::default(),
            keys_erased: AtomicUsize::default(),
        }
    }

    /// Reset the performance metrics.
    pub fn reset(&self) {
        self.bytes_read.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.reads.store(0, Ordering::Relaxed);
        self.keys_read.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.keys_erased.store(0, Ordering::Relaxed);
    }

    /// Returns the number of bytes read.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read.load(Ordering::Relaxed)
    }

    /// Returns the number of bytes written.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Returns the number of read requests.
    ///
    /// A batched read of many keys counts as one request.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of keys requested across all read requests.
    pub fn keys_read(&self) -> usize {
        self.keys_read.load(Ordering::Relaxed)
    }

    /// Returns the number of write requests (put, append, and ensure).
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the number of key erase requests.
    ///
    /// Includes keys erased that may not have existed, and excludes [`erase_all`](WritableStorageTraits::erase_all) requests.
    pub fn keys_erased(&self) -> usize {
        self.keys_erased.load(Ordering::Relaxed)
    }

    fn record_write(&self, key_values: &[StoreKeyValue]) {
        let bytes_written = key_values
            .iter()
            .map(|key_value| key_value.value().len())
            .sum::<usize>();
        self.bytes_written
            .fetch_add(bytes_written, Ordering::Relaxed);
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn location(&self) -> &StoreLocation {
        self.storage.location()
    }

    fn get_many(&self, keys: &[StoreKey], lock: bool) -> Result<Vec<Bytes>, StorageError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.keys_read.fetch_add(keys.len(), Ordering::Relaxed);
        let values = self.storage.get_many(keys, lock)?;
        let bytes_read = values.iter().map(Bytes::len).sum();
        self.bytes_read.fetch_add(bytes_read, Ordering::Relaxed);
        Ok(values)
    }

    fn contains(&self, key: &StoreKey) -> Result<bool, StorageError> {
        self.storage.contains(key)
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn put_many(&self, key_values: &[StoreKeyValue], lock: bool) -> Result<(), StorageError> {
        self.record_write(key_values);
        self.storage.put_many(key_values, lock)
    }

    fn append_many(&self, key_values: &[StoreKeyValue], lock: bool) -> Result<(), StorageError> {
        self.record_write(key_values);
        self.storage.append_many(key_values, lock)
    }

    fn ensure(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.bytes_written.fetch_add(value.len(), Ordering::Relaxed);
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.storage.ensure(key, value)
    }

    fn erase_many(&self, keys: &[StoreKey], lock: bool) -> Result<(), StorageError> {
        self.keys_erased.fetch_add(keys.len(), Ordering::Relaxed);
        self.storage.erase_many(keys, lock)
    }

    fn erase_all(&self) -> Result<(), StorageError> {
        self.storage.erase_all()
    }
}

impl<TStorage: ?Sized + LockableStorageTraits> LockableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn lock(&self) -> &StoreLock {
        self.storage.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn performance_metrics() -> Result<(), StorageError> {
        let store = Arc::new(MemoryStore::new());
        let store = Arc::new(PerformanceMetricsStorageAdapter::new(store));
        store.put_many(
            &[
                StoreKeyValue::new("a", vec![0u8, 1, 2]),
                StoreKeyValue::new("b", vec![3u8]),
            ],
            true,
        )?;
        store.append_many(&[StoreKeyValue::new("a", vec![4u8])], true)?;
        store.ensure(&"a.dtype".into(), Bytes::from_static(b"uint8"))?;
        assert_eq!(store.writes(), 3);
        assert_eq!(store.bytes_written(), 10);

        let values = store.get_many(&["a".into(), "b".into()], false)?;
        assert_eq!(values.len(), 2);
        assert_eq!(store.reads(), 1);
        assert_eq!(store.keys_read(), 2);
        assert_eq!(store.bytes_read(), 5);

        assert!(store.get(&"missing".into(), false).is_err());
        assert_eq!(store.reads(), 2);

        store.erase_many(&["a".into(), "missing".into()], true)?;
        assert_eq!(store.keys_erased(), 2);

        store.reset();
        assert_eq!(store.reads(), 0);
        assert_eq!(store.bytes_written(), 0);
        Ok(())
    }

    #[test]
    fn performance_metrics_forwards_location_and_lock() {
        let inner = Arc::new(MemoryStore::new_with_location("memory://metrics"));
        let store = PerformanceMetricsStorageAdapter::new(inner.clone());
        assert_eq!(store.location(), inner.location());
        assert!(std::ptr::eq(store.lock(), inner.lock()));
    }
}
