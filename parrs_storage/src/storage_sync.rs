use std::sync::Arc;

use auto_impl::auto_impl;

use super::{Bytes, StorageError, StoreKey, StoreKeyValue, StoreLocation, StoreLock};

/// Readable storage traits.
#[auto_impl(&, Arc)]
pub trait ReadableStorageTraits: Send + Sync {
    /// Return the location of the store.
    fn location(&self) -> &StoreLocation;

    /// Retrieve the values (bytes) associated with `keys`, in the order of `keys`.
    ///
    /// If `lock` is true the store lock is held for the duration of the read.
    ///
    /// # Errors
    /// Returns [`StorageError::KeyNotFound`] if any key is not in the store, or a [`StorageError`] if there is an underlying storage error.
    fn get_many(&self, keys: &[StoreKey], lock: bool) -> Result<Vec<Bytes>, StorageError>;

    /// Retrieve the value (bytes) associated with a given [`StoreKey`].
    ///
    /// # Errors
    /// Returns [`StorageError::KeyNotFound`] if the key is not in the store, or a [`StorageError`] if there is an underlying storage error.
    fn get(&self, key: &StoreKey, lock: bool) -> Result<Bytes, StorageError> {
        self.get_many(std::slice::from_ref(key), lock)?
            .pop()
            .ok_or_else(|| StorageError::KeyNotFound(key.clone()))
    }

    /// Returns true if `key` is in the store.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn contains(&self, key: &StoreKey) -> Result<bool, StorageError>;
}

/// Writable storage traits.
#[auto_impl(&, Arc)]
pub trait WritableStorageTraits: Send + Sync {
    /// Store the values of `key_values`, replacing any existing values.
    ///
    /// If `lock` is true the store lock is held for the duration of the write.
    ///
    /// # Errors
    /// Returns a [`StorageError`] on failure to store.
    fn put_many(&self, key_values: &[StoreKeyValue], lock: bool) -> Result<(), StorageError>;

    /// Append the values of `key_values` to the existing values, creating entries that do not exist.
    ///
    /// If `lock` is true the store lock is held for the duration of the write.
    ///
    /// # Errors
    /// Returns a [`StorageError`] on failure to store.
    fn append_many(&self, key_values: &[StoreKeyValue], lock: bool) -> Result<(), StorageError>;

    /// Insert or set a single value without taking the store lock.
    ///
    /// Setting the same value repeatedly is idempotent.
    ///
    /// # Errors
    /// Returns a [`StorageError`] on failure to store.
    fn ensure(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError>;

    /// Erase the values associated with `keys`.
    ///
    /// Keys that are not in the store are ignored.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn erase_many(&self, keys: &[StoreKey], lock: bool) -> Result<(), StorageError>;

    /// Erase every value in the store.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn erase_all(&self) -> Result<(), StorageError>;
}

/// Lockable storage traits.
#[auto_impl(&, Arc)]
pub trait LockableStorageTraits: Send + Sync {
    /// Return the store-wide lock.
    ///
    /// Callers may hold the lock around multi-step sequences of store requests.
    fn lock(&self) -> &StoreLock;
}

/// A supertrait of [`ReadableStorageTraits`], [`WritableStorageTraits`] and [`LockableStorageTraits`].
pub trait ReadableWritableStorageTraits:
    ReadableStorageTraits + WritableStorageTraits + LockableStorageTraits
{
    /// Return a readable version of the store.
    fn readable(self: Arc<Self>) -> Arc<dyn ReadableStorageTraits>;

    /// Return a writable version of the store.
    fn writable(self: Arc<Self>) -> Arc<dyn WritableStorageTraits>;
}

impl<T> ReadableWritableStorageTraits for T
where
    T: ReadableStorageTraits + WritableStorageTraits + LockableStorageTraits + 'static,
{
    fn readable(self: Arc<Self>) -> Arc<dyn ReadableStorageTraits> {
        self
    }

    fn writable(self: Arc<Self>) -> Arc<dyn WritableStorageTraits> {
        self
    }
}
