//! `parrs` stores typed arrays in key-addressed, append-capable byte stores.
//!
//! An [`Array`](crate::array::Array) is a byte buffer and a [`DataType`](crate::array::DataType).
//! `parrs` splits an array into two store entries: the raw bytes at the data key `K`, and the canonical data type string at the metadata key `K.dtype`.
//! For a hierarchical key such as `("a", "b", "c")` the metadata key is `("a", "b", "c.dtype")`, so data and metadata share a prefix.
//! The underlying store needs no awareness of array semantics.
//!
//! There are two ways to access arrays:
//! - the stateless bulk functions [`store_arrays`](crate::array::store_arrays) and [`retrieve_arrays`](crate::array::retrieve_arrays), which resolve data types through a [`DataTypeCache`](crate::array::DataTypeCache), and
//! - [`ArrayStore`](crate::array::ArrayStore), bound to one store, which adds incremental appends and always reads data types fresh from the store.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! use parrs::array::{Array, ArrayBulkTraits, ArrayIncrementalTraits, ArrayStore, StoreOptions};
//! use parrs::storage::{store::MemoryStore, StoreKey};
//!
//! let store = ArrayStore::new(Arc::new(MemoryStore::new()));
//! let options = StoreOptions::default();
//!
//! // Bulk store and load
//! let key = StoreKey::from(("experiment", "run", "x"));
//! store.store(&[(key.clone(), Array::new_with_elements(&[1.0f64, 2.0, 3.0]))], &options)?;
//! let arrays = store.load(&[key], &options)?;
//! assert_eq!(arrays[0].to_elements::<f64>()?, vec![1.0, 2.0, 3.0]);
//!
//! // Incremental append
//! let key = StoreKey::from("y");
//! store.append(&[(key.clone(), Array::new_with_elements(&[1i32, 2]))], &options)?;
//! store.append(&[(key.clone(), Array::new_with_elements(&[3i32]))], &options)?;
//! let arrays = store.get(&[key], &options)?;
//! assert_eq!(arrays[0].to_elements::<i32>()?, vec![1, 2, 3]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Consistency
//! Data and metadata are written by separate store requests and are not atomic as a pair.
//! A concurrent reader may observe new data with old metadata (or the reverse) between them.
//! Callers needing atomicity can hold the store lock ([`ArrayIncrementalTraits::lock`](crate::array::ArrayIncrementalTraits::lock)) around both reads and writes.
//!
//! Data types resolved through a [`DataTypeCache`](crate::array::DataTypeCache) are trusted over the store.
//! The data type of a key must never change after it has been read through the cache.
//!
//! ## Logging
//! `parrs` logs through the [`log`] facade and does not install a logger.
//!
//! ## Licence
//! `parrs` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::wildcard_enum_match_arm)]

pub mod array;
pub mod config;

pub use parrs_data_type as data_type;
pub use parrs_storage as storage;
