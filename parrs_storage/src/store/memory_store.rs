//! A synchronous in-memory store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::BytesMut;
use parking_lot::{ReentrantMutexGuard, RwLock};

use crate::{
    Bytes, LockableStorageTraits, ReadableStorageTraits, StorageError, StoreKey, StoreKeyValue,
    StoreLocation, StoreLock, WritableStorageTraits,
};

static MEMORY_STORE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A synchronous in-memory store.
#[derive(Debug)]
pub struct MemoryStore {
    location: StoreLocation,
    data_map: RwLock<BTreeMap<StoreKey, BytesMut>>,
    lock: StoreLock,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new memory store with a unique location of the form `memory://<n>`.
    #[must_use]
    pub fn new() -> Self {
        let id = MEMORY_STORE_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::new_with_location(format!("memory://{id}"))
    }

    /// Create a new memory store at `location`.
    ///
    /// Two stores sharing a location share entries in any cache keyed by location.
    #[must_use]
    pub fn new_with_location(location: impl Into<StoreLocation>) -> Self {
        Self {
            location: location.into(),
            data_map: RwLock::default(),
            lock: StoreLock::new(()),
        }
    }

    /// Returns the number of entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data_map.read().len()
    }

    /// Returns true if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_map.read().is_empty()
    }

    fn guard(&self, lock: bool) -> Option<ReentrantMutexGuard<'_, ()>> {
        lock.then(|| self.lock.lock())
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn get_many(&self, keys: &[StoreKey], lock: bool) -> Result<Vec<Bytes>, StorageError> {
        let _guard = self.guard(lock);
        let data_map = self.data_map.read();
        keys.iter()
            .map(|key| {
                data_map
                    .get(key)
                    .map(|data| data.clone().freeze())
                    .ok_or_else(|| StorageError::KeyNotFound(key.clone()))
            })
            .collect()
    }

    fn contains(&self, key: &StoreKey) -> Result<bool, StorageError> {
        Ok(self.data_map.read().contains_key(key))
    }
}

impl WritableStorageTraits for MemoryStore {
    fn put_many(&self, key_values: &[StoreKeyValue], lock: bool) -> Result<(), StorageError> {
        let _guard = self.guard(lock);
        let mut data_map = self.data_map.write();
        for key_value in key_values {
            data_map.insert(
                key_value.key().clone(),
                BytesMut::from(key_value.value().as_ref()),
            );
        }
        Ok(())
    }

    fn append_many(&self, key_values: &[StoreKeyValue], lock: bool) -> Result<(), StorageError> {
        let _guard = self.guard(lock);
        let mut data_map = self.data_map.write();
        for key_value in key_values {
            data_map
                .entry(key_value.key().clone())
                .or_default()
                .extend_from_slice(key_value.value());
        }
        Ok(())
    }

    fn ensure(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        let mut data_map = self.data_map.write();
        data_map.insert(key.clone(), BytesMut::from(value.as_ref()));
        Ok(())
    }

    fn erase_many(&self, keys: &[StoreKey], lock: bool) -> Result<(), StorageError> {
        let _guard = self.guard(lock);
        let mut data_map = self.data_map.write();
        for key in keys {
            data_map.remove(key);
        }
        Ok(())
    }

    fn erase_all(&self) -> Result<(), StorageError> {
        let _guard = self.guard(true);
        self.data_map.write().clear();
        Ok(())
    }
}

impl LockableStorageTraits for MemoryStore {
    fn lock(&self) -> &StoreLock {
        &self.lock
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::sync::Arc;

    use super::*;
    use crate::ReadableWritableStorageTraits;

    fn key_value(key: &str, value: &[u8]) -> StoreKeyValue {
        StoreKeyValue::new(key, Bytes::copy_from_slice(value))
    }

    #[test]
    fn memory_put_get() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.put_many(&[key_value("a", &[0, 1]), key_value("b", &[2])], true)?;
        let values = store.get_many(&["b".into(), "a".into()], true)?;
        assert_eq!(values, vec![Bytes::from_static(&[2]), Bytes::from_static(&[0, 1])]);

        store.put_many(&[key_value("a", &[3])], true)?;
        assert_eq!(store.get(&"a".into(), false)?, Bytes::from_static(&[3]));
        assert_eq!(store.len(), 2);
        Ok(())
    }

    #[test]
    fn memory_get_missing() {
        let store = MemoryStore::new();
        let result = store.get_many(&["missing".into()], true);
        assert!(matches!(result, Err(StorageError::KeyNotFound(key)) if key == StoreKey::from("missing")));
    }

    #[test]
    fn memory_append() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.append_many(&[key_value("a", &[0, 1])], true)?;
        store.append_many(&[key_value("a", &[2]), key_value("b", &[3])], true)?;
        assert_eq!(store.get(&"a".into(), true)?, Bytes::from_static(&[0, 1, 2]));
        assert_eq!(store.get(&"b".into(), true)?, Bytes::from_static(&[3]));
        Ok(())
    }

    #[test]
    fn memory_ensure() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let key = StoreKey::from(("a", "b"));
        store.ensure(&key, Bytes::from_static(b"int32"))?;
        store.ensure(&key, Bytes::from_static(b"int32"))?;
        assert_eq!(store.get(&key, false)?, Bytes::from_static(b"int32"));
        store.ensure(&key, Bytes::from_static(b"float64"))?;
        assert_eq!(store.get(&key, false)?, Bytes::from_static(b"float64"));
        Ok(())
    }

    #[test]
    fn memory_erase() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.put_many(&[key_value("a", &[0]), key_value("b", &[1])], true)?;
        store.erase_many(&["a".into(), "missing".into()], true)?;
        assert!(!store.contains(&"a".into())?);
        assert!(store.contains(&"b".into())?);
        store.erase_all()?;
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn memory_lock_reentrant() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let _guard = store.lock().lock();
        store.put_many(&[key_value("a", &[0])], true)?;
        assert_eq!(store.get(&"a".into(), true)?, Bytes::from_static(&[0]));
        Ok(())
    }

    #[test]
    fn memory_location() {
        assert_ne!(MemoryStore::new().location(), MemoryStore::new().location());
        let store = MemoryStore::new_with_location("memory://fixed");
        assert_eq!(store.location().as_str(), "memory://fixed");
    }

    #[test]
    fn memory_upcast() -> Result<(), Box<dyn Error>> {
        let store: Arc<dyn ReadableWritableStorageTraits> = Arc::new(MemoryStore::new());
        store.clone().writable().put_many(&[key_value("a", &[0])], true)?;
        assert_eq!(
            store.clone().readable().get(&"a".into(), true)?,
            Bytes::from_static(&[0])
        );
        Ok(())
    }
}
