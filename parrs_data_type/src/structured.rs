//! Structured data types.

use std::collections::HashSet;

use itertools::Itertools;

use crate::{Endianness, InvalidDataTypeError, PrimitiveDataType};

/// A named field of a [`StructuredDataType`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StructField {
    name: String,
    data_type: PrimitiveDataType,
}

impl StructField {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: PrimitiveDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field data type.
    #[must_use]
    pub const fn data_type(&self) -> &PrimitiveDataType {
        &self.data_type
    }
}

/// A structured (record) data type: an ordered list of named primitive fields.
///
/// Fields are packed without padding, so the element size is the sum of the field sizes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StructuredDataType {
    fields: Vec<StructField>,
}

impl StructuredDataType {
    /// Create a new structured data type.
    ///
    /// # Errors
    /// Returns an [`InvalidDataTypeError`] if `fields` is empty, has duplicate names, or the element size overflows a `usize`.
    pub fn new(fields: Vec<StructField>) -> Result<Self, InvalidDataTypeError> {
        if fields.is_empty() {
            return Err(InvalidDataTypeError::EmptyStructure);
        }
        let mut names = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !names.insert(field.name()) {
                return Err(InvalidDataTypeError::DuplicateField(field.name().to_string()));
            }
        }
        fields
            .iter()
            .try_fold(0usize, |size, field| {
                size.checked_add(field.data_type().size())
            })
            .ok_or(InvalidDataTypeError::SizeOverflow)?;
        Ok(Self { fields })
    }

    /// Returns the fields.
    #[must_use]
    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    /// Returns the field named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the byte offset of the field named `name` within an element.
    #[must_use]
    pub fn offset(&self, name: &str) -> Option<usize> {
        let index = self.fields.iter().position(|field| field.name() == name)?;
        Some(
            self.fields[..index]
                .iter()
                .map(|field| field.data_type().size())
                .sum(),
        )
    }

    /// Return the same data type with the byte order of every field set to `endianness`.
    #[must_use]
    pub fn with_endianness(self, endianness: Endianness) -> Self {
        let fields = self
            .fields
            .into_iter()
            .map(|field| StructField {
                data_type: field.data_type.with_endianness(endianness),
                ..field
            })
            .collect();
        Self { fields }
    }

    /// Returns the size of an element in bytes.
    ///
    /// The sum of the field sizes is checked on construction and never overflows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.data_type().size())
            .sum()
    }
}

fn quote(name: &str) -> String {
    if name.contains('\'') && !name.contains('"') {
        format!("\"{}\"", name.replace('\\', "\\\\"))
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

impl std::fmt::Display for StructuredDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .fields
            .iter()
            .map(|field| format!("({}, '{}')", quote(field.name()), field.data_type().typestr()))
            .join(", ");
        write!(f, "[{fields}]")
    }
}
