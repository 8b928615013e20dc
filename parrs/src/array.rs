//! Typed arrays and their storage.
//!
//! An [`Array`] is an immutable byte buffer and a [`DataType`].
//! Each array is persisted as two store entries:
//! - the raw bytes at the data key, and
//! - the canonical [`DataType`] string at the metadata key, [`data_type_key`] of the data key.
//!
//! Arrays are written and read with:
//! - [`store_arrays`] and [`retrieve_arrays`]: stateless bulk operations, with data types resolved through a [`DataTypeCache`], or
//! - an [`ArrayStore`], implementing [`ArrayBulkTraits`] and [`ArrayIncrementalTraits`].

mod array_store;
mod bulk;
mod data_type_cache;
mod element;
mod store_options;

pub use parrs_data_type::{DataType, DataTypeParseError};

pub use self::{
    array_store::{ArrayBulkTraits, ArrayIncrementalTraits, ArrayStore},
    bulk::{retrieve_arrays, store_arrays},
    data_type_cache::DataTypeCache,
    element::Element,
    store_options::StoreOptions,
};

use parrs_storage::{Bytes, StorageError, StoreKey};
use thiserror::Error;

/// The suffix appended to a data key to form its metadata key.
pub const DATA_TYPE_KEY_SUFFIX: &str = ".dtype";

/// Return the metadata key holding the data type of the array at `key`.
///
/// Only the last component of a hierarchical key is extended, e.g. `("a", "b")` becomes `("a", "b.dtype")`.
#[must_use]
pub fn data_type_key(key: &StoreKey) -> StoreKey {
    key.extend(DATA_TYPE_KEY_SUFFIX)
}

/// An array: a byte buffer interpreted as a flat sequence of elements of a [`DataType`].
///
/// The buffer length should be a multiple of the data type size.
/// This is not checked on construction or on retrieval, see [`Array::is_well_formed`].
///
/// Cloning an array shares the underlying buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Array {
    bytes: Bytes,
    data_type: DataType,
}

impl Array {
    /// Create a new array from `bytes` and a `data_type`.
    pub fn new(bytes: impl Into<Bytes>, data_type: DataType) -> Self {
        Self {
            bytes: bytes.into(),
            data_type,
        }
    }

    /// Create a new array from a slice of elements, in the native byte order.
    #[must_use]
    pub fn new_with_elements<T: Element>(elements: &[T]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytemuck::cast_slice(elements)),
            data_type: T::data_type(),
        }
    }

    /// Returns the bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the data type.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Convert into the bytes and data type.
    #[must_use]
    pub fn into_parts(self) -> (Bytes, DataType) {
        (self.bytes, self.data_type)
    }

    /// Returns the number of complete elements in the array.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.bytes.len() / self.data_type.size()
    }

    /// Returns true if the length of the bytes is a multiple of the data type size.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.bytes.len() % self.data_type.size() == 0
    }

    /// Copy the array into a vector of elements.
    ///
    /// # Errors
    /// Returns [`ArrayError::IncompatibleElementType`] if `T` does not match the data type,
    /// or [`ArrayError::InvalidBytesLength`] if the array is not [well formed](Array::is_well_formed).
    pub fn to_elements<T: Element>(&self) -> Result<Vec<T>, ArrayError> {
        let element_data_type = T::data_type();
        if element_data_type != self.data_type {
            return Err(ArrayError::IncompatibleElementType(
                self.data_type.clone(),
                element_data_type,
            ));
        }
        if !self.is_well_formed() {
            return Err(ArrayError::InvalidBytesLength(
                self.bytes.len(),
                self.data_type.size(),
            ));
        }
        Ok(bytemuck::pod_collect_to_vec(&self.bytes[..]))
    }
}

/// An array error.
#[derive(Clone, Debug, Error)]
pub enum ArrayError {
    /// A store error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// A stored data type string could not be parsed.
    #[error(transparent)]
    DataTypeParseError(#[from] DataTypeParseError),
    /// A stored data type is not valid UTF-8.
    #[error("data type at key {0} is not valid UTF-8")]
    InvalidMetadataEncoding(StoreKey),
    /// The element type is incompatible with the array data type.
    #[error("element type {_1} is incompatible with data type {_0}")]
    IncompatibleElementType(DataType, DataType),
    /// The length of the bytes is not a multiple of the data type size.
    #[error("bytes length {_0} is not a multiple of the data type size {_1}")]
    InvalidBytesLength(usize, usize),
    /// The store returned a different number of values than requested.
    #[error("got {_0} values from the store, expected {_1}")]
    UnexpectedValueCount(usize, usize),
}

/// Zip retrieved data bytes and data types into arrays.
fn zip_arrays(
    bytes: Vec<Bytes>,
    data_types: impl ExactSizeIterator<Item = DataType>,
) -> Result<Vec<Array>, ArrayError> {
    if bytes.len() != data_types.len() {
        return Err(ArrayError::UnexpectedValueCount(
            bytes.len(),
            data_types.len(),
        ));
    }
    Ok(bytes
        .into_iter()
        .zip(data_types)
        .map(|(bytes, data_type)| Array::new(bytes, data_type))
        .collect())
}

/// Parse a stored data type string.
fn parse_data_type(key: &StoreKey, value: &[u8]) -> Result<DataType, ArrayError> {
    let value =
        std::str::from_utf8(value).map_err(|_| ArrayError::InvalidMetadataEncoding(key.clone()))?;
    Ok(DataType::parse(value)?)
}

/// Render the metadata entry of each `(key, array)`.
fn data_type_entries<'a>(
    arrays: &'a [(StoreKey, Array)],
) -> impl Iterator<Item = (StoreKey, Bytes)> + 'a {
    arrays.iter().map(|(key, array)| {
        (
            data_type_key(key),
            Bytes::from(array.data_type().to_string()),
        )
    })
}
