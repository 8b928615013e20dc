//! The byte store API for the [`parrs`](https://docs.rs/parrs/latest/parrs/index.html) crate.
//!
//! A byte store is a key-addressed, append-capable collection of byte values with a store-wide lock.
//! `parrs` layers typed arrays on top of any store implementing the traits in this crate,
//! without the store needing any awareness of array semantics.
//!
//! This crate includes an in-memory store implementation ([`store::MemoryStore`]) and a storage adapter that records request metrics
//! ([`storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter`]).
//!
//! ## Licence
//! `parrs_storage` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod storage_adapter;
mod storage_sync;
pub mod store;
mod store_key;
pub mod store_test;

use std::sync::Arc;

use derive_more::Display;
use thiserror::Error;

pub use store_key::{StoreKey, StoreKeyError, StoreKeys};

pub use self::storage_sync::{
    LockableStorageTraits, ReadableStorageTraits, ReadableWritableStorageTraits,
    WritableStorageTraits,
};

/// [`Arc`] wrapped readable storage.
pub type ReadableStorage = Arc<dyn ReadableStorageTraits>;

/// [`Arc`] wrapped writable storage.
pub type WritableStorage = Arc<dyn WritableStorageTraits>;

/// [`Arc`] wrapped readable, writable, and lockable storage.
pub type ReadableWritableStorage = Arc<dyn ReadableWritableStorageTraits>;

/// The type for bytes used in store get, put and append methods.
///
/// An alias for [`bytes::Bytes`].
pub type Bytes = bytes::Bytes;

/// The store-wide lock exposed by [`LockableStorageTraits::lock`].
///
/// The lock is re-entrant, so a thread holding it may still issue requests with `lock` set.
pub type StoreLock = parking_lot::ReentrantMutex<()>;

/// The location of a store.
///
/// A location identifies one store instance, for example a directory path or a memory store identifier.
#[derive(Clone, Debug, Display, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StoreLocation(String);

impl StoreLocation {
    /// Create a new store location.
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Returns the location as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StoreLocation {
    fn from(location: &str) -> Self {
        Self(location.to_string())
    }
}

impl From<String> for StoreLocation {
    fn from(location: String) -> Self {
        Self(location)
    }
}

/// A [`StoreKey`] and a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreKeyValue {
    key: StoreKey,
    value: Bytes,
}

impl StoreKeyValue {
    /// Create a new [`StoreKeyValue`].
    pub fn new(key: impl Into<StoreKey>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(&self) -> &Bytes {
        &self.value
    }

    /// Convert into the key and value.
    #[must_use]
    pub fn into_parts(self) -> (StoreKey, Bytes) {
        (self.key, self.value)
    }
}

/// A storage error.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A requested key is not in the store.
    #[error("key {0} not found")]
    KeyNotFound(StoreKey),
    /// An invalid store key.
    #[error("invalid store key {0}")]
    InvalidStoreKey(#[from] StoreKeyError),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}
