//! The element data type API for the [`parrs`](https://docs.rs/parrs/latest/parrs/index.html) crate.
//!
//! A [`DataType`] describes the element type of an array stored as raw bytes.
//! It is either a [`PrimitiveDataType`] (a kind, a size in bytes, and a byte order) or a [`StructuredDataType`] (an ordered list of named primitive fields).
//!
//! Data types have a canonical string form, which is what `parrs` persists alongside array bytes:
//! ```
//! # use parrs_data_type::DataType;
//! let data_type: DataType = "int32".parse()?;
//! assert_eq!(data_type, parrs_data_type::int32());
//! assert_eq!(data_type.to_string(), "int32");
//!
//! let data_type: DataType = "[('a', 'int32'), ('b', '>f8')]".parse()?;
//! assert_eq!(data_type.size(), 12);
//! assert_eq!(data_type.to_string(), "[('a', '<i4'), ('b', '>f8')]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Structured data type strings are parsed with a small dedicated grammar and are never evaluated.
//!
//! ## Licence
//! `parrs_data_type` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod data_type;
mod parser;
mod primitive;
mod structured;

pub use data_type::DataType;
pub use parser::{DataTypeParseError, DataTypeParseErrorKind};
pub use primitive::{DataTypeKind, Endianness, InvalidDataTypeError, PrimitiveDataType};
pub use structured::{StructField, StructuredDataType};

macro_rules! data_type_factory {
    ($($name:ident, $kind:ident, $size:literal);* $(;)?) => {
        $(
            #[doc = concat!("Create a `", stringify!($name), "` data type.")]
            #[must_use]
            pub const fn $name() -> DataType {
                DataType::Primitive(PrimitiveDataType::new_unchecked(
                    DataTypeKind::$kind,
                    $size,
                    Endianness::Little,
                ))
            }
        )*
    };
}

data_type_factory!(
    bool, Bool, 1;
    int8, Int, 1;
    int16, Int, 2;
    int32, Int, 4;
    int64, Int, 8;
    uint8, UInt, 1;
    uint16, UInt, 2;
    uint32, UInt, 4;
    uint64, UInt, 8;
    float16, Float, 2;
    float32, Float, 4;
    float64, Float, 8;
    complex64, Complex, 8;
    complex128, Complex, 16;
);

/// Create a fixed-width raw `bytes` data type with `size` bytes per element.
///
/// # Errors
/// Returns an [`InvalidDataTypeError`] if `size` is zero.
pub fn bytes(size: usize) -> Result<DataType, InvalidDataTypeError> {
    PrimitiveDataType::new(DataTypeKind::Bytes, size, Endianness::Little).map(DataType::Primitive)
}
