//! `parrs` global configuration options.
//!
//! See [`Config`] for the list of options.

use std::{sync::OnceLock, time::Duration};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the `parrs` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Data Type Cache Capacity
/// > default: [`None`] (unbounded)
///
/// The maximum number of entries of a default constructed [`DataTypeCache`](crate::array::DataTypeCache).
/// An entry is the resolved data types of one ordered list of keys in one store.
///
/// ## Data Type Cache Time To Live
/// > default: [`None`]
///
/// The time an entry of a default constructed [`DataTypeCache`](crate::array::DataTypeCache) lives after insertion.
///
/// ## Lock
/// > default: `true`
///
/// The default `lock` flag of [`StoreOptions`](crate::array::StoreOptions), passed to the store with data reads and writes.
#[derive(Debug, Clone)]
pub struct Config {
    data_type_cache_capacity: Option<u64>,
    data_type_cache_time_to_live: Option<Duration>,
    lock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_type_cache_capacity: None,
            data_type_cache_time_to_live: None,
            lock: true,
        }
    }
}

impl Config {
    /// Get the [data type cache capacity](#data-type-cache-capacity) configuration.
    #[must_use]
    pub fn data_type_cache_capacity(&self) -> Option<u64> {
        self.data_type_cache_capacity
    }

    /// Set the [data type cache capacity](#data-type-cache-capacity) configuration.
    pub fn set_data_type_cache_capacity(&mut self, capacity: Option<u64>) -> &mut Self {
        self.data_type_cache_capacity = capacity;
        self
    }

    /// Get the [data type cache time to live](#data-type-cache-time-to-live) configuration.
    #[must_use]
    pub fn data_type_cache_time_to_live(&self) -> Option<Duration> {
        self.data_type_cache_time_to_live
    }

    /// Set the [data type cache time to live](#data-type-cache-time-to-live) configuration.
    pub fn set_data_type_cache_time_to_live(
        &mut self,
        time_to_live: Option<Duration>,
    ) -> &mut Self {
        self.data_type_cache_time_to_live = time_to_live;
        self
    }

    /// Get the [lock](#lock) configuration.
    #[must_use]
    pub fn lock(&self) -> bool {
        self.lock
    }

    /// Set the [lock](#lock) configuration.
    pub fn set_lock(&mut self, lock: bool) -> &mut Self {
        self.lock = lock;
        self
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global `parrs` configuration.
#[must_use]
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).read()
}

/// Returns a mutable reference to the global `parrs` configuration.
///
/// The write lock is held until the returned guard is dropped.
#[must_use]
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).write()
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn config_lock() {
        assert!(global_config().lock());
        global_config_mut().set_lock(false);
        assert!(!global_config().lock());
        global_config_mut().set_lock(true);
        assert!(global_config().lock());
    }

    #[test]
    fn config_builder() {
        let mut config = Config::default();
        config
            .set_data_type_cache_capacity(Some(8))
            .set_data_type_cache_time_to_live(Some(Duration::from_secs(1)));
        assert_eq!(config.data_type_cache_capacity(), Some(8));
        assert_eq!(
            config.data_type_cache_time_to_live(),
            Some(Duration::from_secs(1))
        );
    }
}
