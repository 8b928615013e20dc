use std::str::FromStr;

use derive_more::From;

use crate::{
    DataTypeParseError, Endianness, PrimitiveDataType, StructuredDataType,
    parser::{parse_primitive, parse_structured},
};

/// An element data type.
///
/// The [`Display`](std::fmt::Display) form is canonical: parsing it with [`DataType::parse`] yields an equal data type.
#[derive(Clone, Debug, Eq, PartialEq, Hash, From)]
pub enum DataType {
    /// A primitive data type.
    Primitive(PrimitiveDataType),
    /// A structured data type.
    Structured(StructuredDataType),
}

impl DataType {
    /// Parse a data type string.
    ///
    /// A string containing `[` is parsed as a structured data type, anything else as a primitive data type.
    ///
    /// # Errors
    /// Returns a [`DataTypeParseError`] if `input` is not a valid data type.
    pub fn parse(input: &str) -> Result<Self, DataTypeParseError> {
        let data_type = if input.contains('[') {
            parse_structured(input).map(Self::Structured)
        } else {
            parse_primitive(input).map(Self::Primitive)
        };
        data_type.map_err(|kind| DataTypeParseError::new(input, kind))
    }

    /// Returns the size of an element in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Primitive(data_type) => data_type.size(),
            Self::Structured(data_type) => data_type.size(),
        }
    }

    /// Return the same data type in the byte order `endianness`.
    ///
    /// The byte order of a structured data type is set on every field.
    #[must_use]
    pub fn with_endianness(self, endianness: Endianness) -> Self {
        match self {
            Self::Primitive(data_type) => Self::Primitive(data_type.with_endianness(endianness)),
            Self::Structured(data_type) => Self::Structured(data_type.with_endianness(endianness)),
        }
    }

    /// Returns the primitive data type, if this is not structured.
    #[must_use]
    pub const fn as_primitive(&self) -> Option<&PrimitiveDataType> {
        match self {
            Self::Primitive(data_type) => Some(data_type),
            Self::Structured(_) => None,
        }
    }

    /// Returns the structured data type, if this is structured.
    #[must_use]
    pub const fn as_structured(&self) -> Option<&StructuredDataType> {
        match self {
            Self::Primitive(_) => None,
            Self::Structured(data_type) => Some(data_type),
        }
    }

    /// Returns true if this is a structured data type.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive(data_type) => std::fmt::Display::fmt(data_type, f),
            Self::Structured(data_type) => std::fmt::Display::fmt(data_type, f),
        }
    }
}

impl FromStr for DataType {
    type Err = DataTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Self::parse(&string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataTypeKind, DataTypeParseErrorKind};

    #[test]
    fn data_type_parse() {
        assert_eq!(DataType::parse("int32").unwrap(), crate::int32());
        assert_eq!(DataType::parse("<f8").unwrap(), crate::float64());
        assert_eq!(DataType::parse("|S4").unwrap(), crate::bytes(4).unwrap());

        let data_type = DataType::parse("[('a', 'int32')]").unwrap();
        assert!(data_type.is_structured());
        assert_eq!(data_type.size(), 4);
        assert!(data_type.as_primitive().is_none());
        assert_eq!(data_type.as_structured().unwrap().fields().len(), 1);
    }

    #[test]
    fn data_type_parse_error() {
        let error = DataType::parse("int128").unwrap_err();
        assert_eq!(error.input(), "int128");
        assert_eq!(
            error.kind(),
            &DataTypeParseErrorKind::UnknownDataType("int128".to_string())
        );
        assert_eq!(
            error.to_string(),
            "failed to parse data type \"int128\": unknown data type \"int128\""
        );
    }

    #[test]
    fn data_type_display_round_trip() {
        let big = PrimitiveDataType::new(DataTypeKind::UInt, 2, Endianness::Big).unwrap();
        for data_type in [
            crate::bool(),
            crate::complex128(),
            crate::bytes(3).unwrap(),
            DataType::Primitive(big),
            DataType::parse("[a, >u2; b, |S3; c, ?]").unwrap(),
        ] {
            let string = data_type.to_string();
            assert_eq!(DataType::parse(&string).unwrap(), data_type, "{string}");
        }
    }

    #[test]
    fn data_type_with_endianness() {
        assert_eq!(
            crate::int16().with_endianness(Endianness::Big).to_string(),
            ">i2"
        );
        assert_eq!(
            crate::uint8().with_endianness(Endianness::Big),
            crate::uint8()
        );
        let data_type = DataType::parse("[a, >i4; b, |S2]").unwrap();
        assert_eq!(
            data_type.with_endianness(Endianness::Little).to_string(),
            "[('a', '<i4'), ('b', '|S2')]"
        );
    }

    #[test]
    fn data_type_serde() {
        let data_type = DataType::parse("[('a', '>i2')]").unwrap();
        let json = serde_json::to_string(&data_type).unwrap();
        assert_eq!(json, r#""[('a', '>i2')]""#);
        assert_eq!(serde_json::from_str::<DataType>(&json).unwrap(), data_type);
        assert!(serde_json::from_str::<DataType>(r#""float128""#).is_err());
        assert!(serde_json::from_str::<DataType>("4").is_err());
    }
}
