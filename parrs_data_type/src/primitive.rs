//! Primitive data types.

use derive_more::Display;
use thiserror::Error;

/// The byte order of a multi-byte element.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Hash)]
pub enum Endianness {
    /// Little endian.
    #[display("little")]
    Little,
    /// Big endian.
    #[display("big")]
    Big,
}

impl Endianness {
    /// Return the native endianness of the target.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

/// The kind of a primitive data type.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Hash)]
pub enum DataTypeKind {
    /// A boolean stored as a single byte.
    #[display("bool")]
    Bool,
    /// A signed integer.
    #[display("int")]
    Int,
    /// An unsigned integer.
    #[display("uint")]
    UInt,
    /// An IEEE 754 floating point number.
    #[display("float")]
    Float,
    /// A complex number made of two floating point numbers.
    #[display("complex")]
    Complex,
    /// Fixed-width raw bytes.
    #[display("bytes")]
    Bytes,
}

impl DataTypeKind {
    /// The typestr character of the kind.
    #[must_use]
    pub const fn typestr_char(self) -> char {
        match self {
            Self::Bool => 'b',
            Self::Int => 'i',
            Self::UInt => 'u',
            Self::Float => 'f',
            Self::Complex => 'c',
            Self::Bytes => 'S',
        }
    }

    /// Return the kind with the typestr character `c`.
    #[must_use]
    pub const fn from_typestr_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(Self::Bool),
            'i' => Some(Self::Int),
            'u' => Some(Self::UInt),
            'f' => Some(Self::Float),
            'c' => Some(Self::Complex),
            'S' => Some(Self::Bytes),
            _ => None,
        }
    }

    /// Returns true if `size` (in bytes) is supported for this kind.
    #[must_use]
    pub const fn supports_size(self, size: usize) -> bool {
        match self {
            Self::Bool => size == 1,
            Self::Int | Self::UInt => matches!(size, 1 | 2 | 4 | 8),
            Self::Float => matches!(size, 2 | 4 | 8),
            Self::Complex => matches!(size, 8 | 16),
            Self::Bytes => size > 0,
        }
    }
}

/// An invalid data type.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InvalidDataTypeError {
    /// The size is not supported for the kind.
    #[error("unsupported size {size} for {kind} data type")]
    UnsupportedSize {
        /// The data type kind.
        kind: DataTypeKind,
        /// The size in bytes.
        size: usize,
    },
    /// A structured data type has no fields.
    #[error("structured data type has no fields")]
    EmptyStructure,
    /// A structured data type has more than one field with the same name.
    #[error("duplicate field name {0:?} in structured data type")]
    DuplicateField(String),
    /// The size of a structured data type does not fit in a `usize`.
    #[error("structured data type size overflows usize")]
    SizeOverflow,
}

/// A primitive data type: a kind, a size in bytes, and a byte order.
///
/// The byte order is [`None`] for single-byte elements and raw bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PrimitiveDataType {
    kind: DataTypeKind,
    size: usize,
    endianness: Option<Endianness>,
}

impl PrimitiveDataType {
    /// Create a new primitive data type.
    ///
    /// `endianness` is ignored for single-byte elements and raw bytes.
    ///
    /// # Errors
    /// Returns [`InvalidDataTypeError::UnsupportedSize`] if `size` is not supported for `kind`.
    pub const fn new(
        kind: DataTypeKind,
        size: usize,
        endianness: Endianness,
    ) -> Result<Self, InvalidDataTypeError> {
        if kind.supports_size(size) {
            Ok(Self::new_unchecked(kind, size, endianness))
        } else {
            Err(InvalidDataTypeError::UnsupportedSize { kind, size })
        }
    }

    pub(crate) const fn new_unchecked(
        kind: DataTypeKind,
        size: usize,
        endianness: Endianness,
    ) -> Self {
        let endianness = if size == 1 || matches!(kind, DataTypeKind::Bool | DataTypeKind::Bytes)
        {
            None
        } else {
            Some(endianness)
        };
        Self {
            kind,
            size,
            endianness,
        }
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> DataTypeKind {
        self.kind
    }

    /// Returns the size of an element in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the byte order, or [`None`] if the byte order is not applicable.
    #[must_use]
    pub const fn endianness(&self) -> Option<Endianness> {
        self.endianness
    }

    /// Return the same data type with the byte order `endianness`.
    #[must_use]
    pub const fn with_endianness(self, endianness: Endianness) -> Self {
        Self::new_unchecked(self.kind, self.size, endianness)
    }

    /// Return the name of a little endian or byte order independent data type (e.g. `int32`).
    ///
    /// Returns [`None`] for big endian data types and raw bytes.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        if matches!(self.endianness, Some(Endianness::Big)) {
            return None;
        }
        match (self.kind, self.size) {
            (DataTypeKind::Bool, 1) => Some("bool"),
            (DataTypeKind::Int, 1) => Some("int8"),
            (DataTypeKind::Int, 2) => Some("int16"),
            (DataTypeKind::Int, 4) => Some("int32"),
            (DataTypeKind::Int, 8) => Some("int64"),
            (DataTypeKind::UInt, 1) => Some("uint8"),
            (DataTypeKind::UInt, 2) => Some("uint16"),
            (DataTypeKind::UInt, 4) => Some("uint32"),
            (DataTypeKind::UInt, 8) => Some("uint64"),
            (DataTypeKind::Float, 2) => Some("float16"),
            (DataTypeKind::Float, 4) => Some("float32"),
            (DataTypeKind::Float, 8) => Some("float64"),
            (DataTypeKind::Complex, 8) => Some("complex64"),
            (DataTypeKind::Complex, 16) => Some("complex128"),
            _ => None,
        }
    }

    /// Return the little endian data type with the name `name` (e.g. `int32`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (kind, size) = match name {
            "bool" => (DataTypeKind::Bool, 1),
            "int8" => (DataTypeKind::Int, 1),
            "int16" => (DataTypeKind::Int, 2),
            "int32" => (DataTypeKind::Int, 4),
            "int64" => (DataTypeKind::Int, 8),
            "uint8" => (DataTypeKind::UInt, 1),
            "uint16" => (DataTypeKind::UInt, 2),
            "uint32" => (DataTypeKind::UInt, 4),
            "uint64" => (DataTypeKind::UInt, 8),
            "float16" => (DataTypeKind::Float, 2),
            "float32" => (DataTypeKind::Float, 4),
            "float64" => (DataTypeKind::Float, 8),
            "complex64" => (DataTypeKind::Complex, 8),
            "complex128" => (DataTypeKind::Complex, 16),
            _ => return None,
        };
        Some(Self::new_unchecked(kind, size, Endianness::Little))
    }

    /// Return the array interface typestr of the data type, e.g. `<i4`, `>f8`, `|b1`, `|S8`.
    #[must_use]
    pub fn typestr(&self) -> String {
        let byteorder = match self.endianness {
            None => '|',
            Some(Endianness::Little) => '<',
            Some(Endianness::Big) => '>',
        };
        format!("{byteorder}{}{}", self.kind.typestr_char(), self.size)
    }
}

impl std::fmt::Display for PrimitiveDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.typestr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_sizes() {
        assert!(PrimitiveDataType::new(DataTypeKind::Int, 3, Endianness::Little).is_err());
        assert!(PrimitiveDataType::new(DataTypeKind::Float, 1, Endianness::Little).is_err());
        assert!(PrimitiveDataType::new(DataTypeKind::Bool, 2, Endianness::Little).is_err());
        assert!(PrimitiveDataType::new(DataTypeKind::Bytes, 0, Endianness::Little).is_err());
        assert!(PrimitiveDataType::new(DataTypeKind::Bytes, 13, Endianness::Big).is_ok());
    }

    #[test]
    fn primitive_endianness_not_applicable() {
        let int8 = PrimitiveDataType::new(DataTypeKind::Int, 1, Endianness::Big).unwrap();
        assert_eq!(int8.endianness(), None);
        assert_eq!(int8.typestr(), "|i1");
        assert_eq!(int8.to_string(), "int8");

        let bytes = PrimitiveDataType::new(DataTypeKind::Bytes, 8, Endianness::Big).unwrap();
        assert_eq!(bytes.endianness(), None);
        assert_eq!(bytes.to_string(), "|S8");
    }

    #[test]
    fn primitive_display() {
        let int32 = PrimitiveDataType::new(DataTypeKind::Int, 4, Endianness::Little).unwrap();
        assert_eq!(int32.to_string(), "int32");
        assert_eq!(int32.typestr(), "<i4");
        let int32_be = int32.with_endianness(Endianness::Big);
        assert_eq!(int32_be.to_string(), ">i4");
        assert_eq!(int32_be.name(), None);
    }

    #[test]
    fn primitive_names() {
        for name in [
            "bool", "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64",
            "float16", "float32", "float64", "complex64", "complex128",
        ] {
            let data_type = PrimitiveDataType::from_name(name).unwrap();
            assert_eq!(data_type.name(), Some(name));
        }
        assert!(PrimitiveDataType::from_name("int128").is_none());
    }
}
