use crate::config::global_config;

/// Options for array store requests.
///
/// The default values are:
/// - `lock`: [`Config::lock`](crate::config::Config::lock) (`true` unless changed)
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    lock: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            lock: global_config().lock(),
        }
    }
}

impl StoreOptions {
    /// Return the lock setting.
    ///
    /// If true, the store lock is held for the duration of each data read and write.
    /// Data type reads never hold the store lock.
    #[must_use]
    pub fn lock(&self) -> bool {
        self.lock
    }

    /// Set whether or not to hold the store lock for data reads and writes.
    pub fn set_lock(&mut self, lock: bool) -> &mut Self {
        self.lock = lock;
        self
    }

    /// Set whether or not to hold the store lock for data reads and writes.
    #[must_use]
    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }
}
