use std::sync::Arc;

use parrs_storage::{
    Bytes, LockableStorageTraits, ReadableStorageTraits, StoreKey, StoreKeyValue, StoreLock,
    WritableStorageTraits,
};

use super::{
    Array, ArrayError, DataTypeCache, StoreOptions, data_type_entries, data_type_key,
    parse_data_type, retrieve_arrays, store_arrays, zip_arrays,
};

/// Arrays in a store.
///
/// An array store holds a reference to a store and a [`DataTypeCache`], and provides
/// - bulk access through [`ArrayBulkTraits`], with cached data types, and
/// - incremental access through [`ArrayIncrementalTraits`], with data types always read from the store.
///
/// The two should not be mixed on the same keys: appending to an array may change its data type, and bulk loads trust the cache.
///
/// All consistency guarantees (ordering of writes, locking) are those of the underlying store.
pub struct ArrayStore<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    data_type_cache: Arc<DataTypeCache>,
}

impl<TStorage: ?Sized> ArrayStore<TStorage> {
    /// Create a new array store with a default constructed [`DataTypeCache`].
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self::new_with_data_type_cache(storage, Arc::new(DataTypeCache::default()))
    }

    /// Create a new array store with a data type cache, which may be shared with other array stores.
    #[must_use]
    pub fn new_with_data_type_cache(
        storage: Arc<TStorage>,
        data_type_cache: Arc<DataTypeCache>,
    ) -> Self {
        Self {
            storage,
            data_type_cache,
        }
    }

    /// Get the underlying storage backing the array store.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }

    /// Get the data type cache.
    #[must_use]
    pub fn data_type_cache(&self) -> &Arc<DataTypeCache> {
        &self.data_type_cache
    }
}

/// Bulk array store and load.
pub trait ArrayBulkTraits {
    /// Store `arrays`, replacing any existing arrays at the same keys.
    ///
    /// See [`store_arrays`].
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a store request fails.
    fn store(&self, arrays: &[(StoreKey, Array)], options: &StoreOptions)
        -> Result<(), ArrayError>;

    /// Load the arrays at `keys`, in the order of `keys`, with data types resolved through the data type cache.
    ///
    /// See [`retrieve_arrays`].
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a data or metadata key is not in the store, a stored data type is invalid, or a store request fails.
    fn load(&self, keys: &[StoreKey], options: &StoreOptions) -> Result<Vec<Array>, ArrayError>;
}

impl<TStorage: ?Sized + ReadableStorageTraits + WritableStorageTraits> ArrayBulkTraits
    for ArrayStore<TStorage>
{
    fn store(
        &self,
        arrays: &[(StoreKey, Array)],
        options: &StoreOptions,
    ) -> Result<(), ArrayError> {
        store_arrays(&*self.storage, arrays, options)
    }

    fn load(&self, keys: &[StoreKey], options: &StoreOptions) -> Result<Vec<Array>, ArrayError> {
        retrieve_arrays(&*self.storage, &self.data_type_cache, keys, options)
    }
}

/// Incremental array access.
///
/// Data types are never cached: every [`get`](ArrayIncrementalTraits::get) reads the latest data types from the store.
pub trait ArrayIncrementalTraits {
    /// Append `arrays` to the arrays at the same keys, creating arrays that do not exist.
    ///
    /// The data type of each array is set first, then all data is appended in one store request.
    /// The data type of an array is the last one appended; appending with a stable data type is idempotent for the metadata.
    /// A concurrent [`get`](ArrayIncrementalTraits::get) between the two steps may observe the new data type with the old data.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a store request fails.
    fn append(
        &self,
        arrays: &[(StoreKey, Array)],
        options: &StoreOptions,
    ) -> Result<(), ArrayError>;

    /// Get the arrays at `keys`, in the order of `keys`.
    ///
    /// Data types are read from the store without the store lock.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a data or metadata key is not in the store, a stored data type is invalid, or a store request fails.
    fn get(&self, keys: &[StoreKey], options: &StoreOptions) -> Result<Vec<Array>, ArrayError>;

    /// Delete the data types of the arrays at `keys`.
    ///
    /// The data of the arrays is retained.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a store request fails.
    fn delete(&self, keys: &[StoreKey], options: &StoreOptions) -> Result<(), ArrayError>;

    /// Insert or set the raw value at `key`, without the store lock.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a store request fails.
    fn ensure(&self, key: &StoreKey, value: Bytes) -> Result<(), ArrayError>;

    /// Erase everything in the store.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a store request fails.
    fn drop_all(&self) -> Result<(), ArrayError>;

    /// Return the store lock, for callers coordinating multi-step sequences.
    fn lock(&self) -> &StoreLock;
}

impl<
        TStorage: ?Sized + ReadableStorageTraits + WritableStorageTraits + LockableStorageTraits,
    > ArrayIncrementalTraits for ArrayStore<TStorage>
{
    fn append(
        &self,
        arrays: &[(StoreKey, Array)],
        options: &StoreOptions,
    ) -> Result<(), ArrayError> {
        for (key, data_type) in data_type_entries(arrays) {
            log::trace!("setting data type at {key}");
            self.storage.ensure(&key, data_type)?;
        }
        let key_values: Vec<StoreKeyValue> = arrays
            .iter()
            .map(|(key, array)| StoreKeyValue::new(key, array.bytes().clone()))
            .collect();
        log::debug!("appending {} arrays", key_values.len());
        self.storage.append_many(&key_values, options.lock())?;
        Ok(())
    }

    fn get(&self, keys: &[StoreKey], options: &StoreOptions) -> Result<Vec<Array>, ArrayError> {
        let bytes = self.storage.get_many(keys, options.lock())?;
        let data_type_keys: Vec<StoreKey> = keys.iter().map(data_type_key).collect();
        let data_types = self
            .storage
            .get_many(&data_type_keys, false)?
            .iter()
            .zip(&data_type_keys)
            .map(|(value, key)| parse_data_type(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        zip_arrays(bytes, data_types.into_iter())
    }

    fn delete(&self, keys: &[StoreKey], options: &StoreOptions) -> Result<(), ArrayError> {
        let data_type_keys: Vec<StoreKey> = keys.iter().map(data_type_key).collect();
        self.storage.erase_many(&data_type_keys, options.lock())?;
        Ok(())
    }

    fn ensure(&self, key: &StoreKey, value: Bytes) -> Result<(), ArrayError> {
        Ok(self.storage.ensure(key, value)?)
    }

    fn drop_all(&self) -> Result<(), ArrayError> {
        log::debug!("erasing all values in {}", self.storage.location());
        Ok(self.storage.erase_all()?)
    }

    fn lock(&self) -> &StoreLock {
        self.storage.lock()
    }
}
