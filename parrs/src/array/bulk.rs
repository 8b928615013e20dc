use parrs_storage::{ReadableStorageTraits, StoreKey, StoreKeyValue, WritableStorageTraits};

use super::{Array, ArrayError, DataTypeCache, StoreOptions, data_type_entries, zip_arrays};

/// Store `arrays` in `storage`, replacing any existing arrays at the same keys.
///
/// The data of every array is written in one store request, then the data type of each array is written to its metadata key.
/// The two steps are not atomic: a concurrent reader may observe new data with the previous data type, or the reverse.
///
/// # Errors
/// Returns an [`ArrayError`] if a store request fails.
/// If the data types fail to store after the data has been written, the data is not rolled back.
pub fn store_arrays<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    arrays: &[(StoreKey, Array)],
    options: &StoreOptions,
) -> Result<(), ArrayError> {
    let key_values: Vec<StoreKeyValue> = arrays
        .iter()
        .map(|(key, array)| StoreKeyValue::new(key, array.bytes().clone()))
        .collect();
    log::debug!("storing {} arrays", key_values.len());
    storage.put_many(&key_values, options.lock())?;
    for (key, data_type) in data_type_entries(arrays) {
        log::trace!("storing data type at {key}");
        storage.ensure(&key, data_type)?;
    }
    Ok(())
}

/// Retrieve the arrays at `keys` in `storage`, in the order of `keys`.
///
/// The data is read in one store request and the data types are resolved through `data_type_cache`.
/// If `options` does not set `lock`, the two run in parallel.
/// Otherwise the data is read on the calling thread, so a caller already holding the store lock may load.
/// The returned arrays share the buffers returned by the store.
///
/// The length of each array is not validated against its data type, see [`Array::is_well_formed`].
///
/// # Errors
/// Returns an [`ArrayError`] if a data or metadata key is not in the store, a stored data type is invalid, or a store request fails.
pub fn retrieve_arrays<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    data_type_cache: &DataTypeCache,
    keys: &[StoreKey],
    options: &StoreOptions,
) -> Result<Vec<Array>, ArrayError> {
    let (bytes, data_types) = if options.lock() {
        // the store lock is bound to the thread that takes it
        let bytes = storage.get_many(keys, true);
        (bytes, data_type_cache.resolve(storage, keys))
    } else {
        rayon::join(
            || storage.get_many(keys, false),
            || data_type_cache.resolve(storage, keys),
        )
    };
    let bytes = bytes?;
    let data_types = data_types?;
    zip_arrays(bytes, data_types.iter().cloned())
}
