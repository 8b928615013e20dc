use std::{sync::Arc, time::Duration};

use moka::{policy::EvictionPolicy, sync::Cache};
use parrs_storage::{ReadableStorageTraits, StoreKey, StoreLocation};

use super::{ArrayError, DataType, data_type_key, parse_data_type};
use crate::config::global_config;

type DataTypeCacheKey = (StoreLocation, Vec<StoreKey>);

/// A cache of the data types of arrays.
///
/// An entry maps a store location and an ordered list of data keys to the data types of those keys, in order.
/// A cache hit issues no store requests.
///
/// Entries are never refreshed from the store.
/// The data type of a key must not change after it has been resolved through the cache, otherwise stale data types are returned.
/// Use [`DataTypeCache::invalidate_all`] if data types are changed out of band.
///
/// The capacity (number of entries) and time to live of the cache are set on construction.
/// A default constructed cache uses the [global configuration](crate::config::Config).
pub struct DataTypeCache {
    cache: Cache<DataTypeCacheKey, Arc<Vec<DataType>>>,
}

impl Default for DataTypeCache {
    fn default() -> Self {
        let config = global_config();
        Self::build(
            config.data_type_cache_capacity(),
            config.data_type_cache_time_to_live(),
        )
    }
}

impl DataTypeCache {
    /// Create a new data type cache holding at most `capacity` entries.
    ///
    /// The least recently used entries are evicted first.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self::build(Some(capacity), None)
    }

    /// Create a new data type cache with entries that expire `time_to_live` after insertion.
    ///
    /// The cache is unbounded if `capacity` is [`None`].
    #[must_use]
    pub fn with_time_to_live(capacity: Option<u64>, time_to_live: Duration) -> Self {
        Self::build(capacity, Some(time_to_live))
    }

    /// Create a new unbounded data type cache.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::build(None, None)
    }

    fn build(capacity: Option<u64>, time_to_live: Option<Duration>) -> Self {
        let mut builder = Cache::builder().eviction_policy(EvictionPolicy::lru());
        if let Some(capacity) = capacity {
            builder = builder.max_capacity(capacity);
        }
        if let Some(time_to_live) = time_to_live {
            builder = builder.time_to_live(time_to_live);
        }
        Self {
            cache: builder.build(),
        }
    }

    /// Return the number of entries in the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.run_pending_tasks();
        usize::try_from(self.cache.entry_count()).unwrap_or(usize::MAX)
    }

    /// Returns true if the cache has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard every entry in the cache.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Resolve the data types of the arrays at `keys` in `storage`.
    ///
    /// On a cache miss, the data types are read from the store in one request (without the store lock) and cached.
    /// Concurrent misses for the same `keys` are coalesced into one store request.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a metadata key is not in the store or a data type is invalid.
    /// Failed resolutions are not cached.
    pub fn resolve<TStorage: ?Sized + ReadableStorageTraits>(
        &self,
        storage: &TStorage,
        keys: &[StoreKey],
    ) -> Result<Arc<Vec<DataType>>, ArrayError> {
        let cache_key = (storage.location().clone(), keys.to_vec());
        self.cache
            .try_get_with::<_, ArrayError>(cache_key, || {
                log::debug!(
                    "data type cache miss for {} keys in {}",
                    keys.len(),
                    storage.location()
                );
                let data_type_keys: Vec<StoreKey> = keys.iter().map(data_type_key).collect();
                let values = storage.get_many(&data_type_keys, false)?;
                if values.len() != data_type_keys.len() {
                    return Err(ArrayError::UnexpectedValueCount(
                        values.len(),
                        data_type_keys.len(),
                    ));
                }
                let data_types = data_type_keys
                    .iter()
                    .zip(&values)
                    .map(|(key, value)| parse_data_type(key, value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Arc::new(data_types))
            })
            .map_err(Arc::unwrap_or_clone)
    }
}

#[cfg(test)]
mod tests {
    use parrs_storage::{
        StorageError, StoreKeyValue, WritableStorageTraits,
        storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter, store::MemoryStore,
    };

    use super::*;

    fn store_with_data_types() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .put_many(
                &[
                    StoreKeyValue::new("a.dtype", "int32"),
                    StoreKeyValue::new(("g", "b.dtype"), "[('x', '>f8')]"),
                    StoreKeyValue::new("bad.dtype", "int128"),
                ],
                false,
            )
            .unwrap();
        store
    }

    #[test]
    fn data_type_cache_hit() {
        let store = Arc::new(PerformanceMetricsStorageAdapter::new(store_with_data_types()));
        let cache = DataTypeCache::unbounded();
        let keys = [StoreKey::from("a"), StoreKey::from(("g", "b"))];

        let data_types = cache.resolve(&*store, &keys).unwrap();
        assert_eq!(data_types[0], parrs_data_type::int32());
        assert_eq!(data_types[1].to_string(), "[('x', '>f8')]");
        assert_eq!(store.reads(), 1);
        assert_eq!(store.keys_read(), 2);

        let cached = cache.resolve(&*store, &keys).unwrap();
        assert!(Arc::ptr_eq(&data_types, &cached));
        assert_eq!(store.reads(), 1);
        assert_eq!(cache.len(), 1);

        // key order is part of the cache key
        let reversed = [keys[1].clone(), keys[0].clone()];
        let data_types_reversed = cache.resolve(&*store, &reversed).unwrap();
        assert_eq!(data_types_reversed[1], parrs_data_type::int32());
        assert_eq!(store.reads(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn data_type_cache_location() {
        let cache = DataTypeCache::unbounded();
        let store_a = MemoryStore::new();
        let store_b = MemoryStore::new();
        store_a
            .put_many(&[StoreKeyValue::new("x.dtype", "int8")], false)
            .unwrap();
        store_b
            .put_many(&[StoreKeyValue::new("x.dtype", "uint8")], false)
            .unwrap();
        let keys = [StoreKey::from("x")];
        assert_eq!(
            cache.resolve(&store_a, &keys).unwrap()[0],
            parrs_data_type::int8()
        );
        assert_eq!(
            cache.resolve(&store_b, &keys).unwrap()[0],
            parrs_data_type::uint8()
        );
    }

    #[test]
    fn data_type_cache_errors_not_cached() {
        let store = Arc::new(PerformanceMetricsStorageAdapter::new(store_with_data_types()));
        let cache = DataTypeCache::unbounded();

        assert!(matches!(
            cache.resolve(&*store, &[StoreKey::from("missing")]),
            Err(ArrayError::StorageError(StorageError::KeyNotFound(key)))
                if key == StoreKey::from("missing.dtype")
        ));
        assert!(matches!(
            cache.resolve(&*store, &[StoreKey::from("bad")]),
            Err(ArrayError::DataTypeParseError(_))
        ));
        assert!(cache.is_empty());

        assert!(cache.resolve(&*store, &[StoreKey::from("bad")]).is_err());
        assert_eq!(store.reads(), 3);
    }

    #[test]
    fn data_type_cache_invalidate_all() {
        let store = Arc::new(PerformanceMetricsStorageAdapter::new(store_with_data_types()));
        let cache = DataTypeCache::new(16);
        let keys = [StoreKey::from("a")];
        cache.resolve(&*store, &keys).unwrap();
        cache.invalidate_all();
        store
            .put_many(&[StoreKeyValue::new("a.dtype", "int64")], false)
            .unwrap();
        assert_eq!(
            cache.resolve(&*store, &keys).unwrap()[0],
            parrs_data_type::int64()
        );
        assert_eq!(store.reads(), 2);
    }

    #[test]
    fn data_type_cache_time_to_live() {
        let store = Arc::new(PerformanceMetricsStorageAdapter::new(store_with_data_types()));
        let cache = DataTypeCache::with_time_to_live(None, Duration::from_millis(10));
        let keys = [StoreKey::from("a")];
        cache.resolve(&*store, &keys).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        cache.resolve(&*store, &keys).unwrap();
        assert_eq!(store.reads(), 2);
    }
}
