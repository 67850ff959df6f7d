//! # Schema-Driven Binary Layout
//!
//! A [`Schema`] is an ordered list of named fields. Encoding a
//! [`FieldSet`] against a schema produces a *table*:
//!
//! ```text
//! +--------------------------+  <- table start
//! | inline fields, in order  |  scalars and fixed arrays are written in
//! |  (offset slots for       |  place; variable and nested fields leave a
//! |   variable content)      |  4-byte offset slot here
//! +--------------------------+
//! | tail: vectors, nested    |  appended in field order, each aligned to
//! | tables, table arrays     |  4 bytes, slots backpatched afterwards
//! +--------------------------+
//! ```
//!
//! Offset bases are fixed per kind:
//!
//! | kind          | offset relative to | content at the offset                  |
//! |---------------|--------------------|----------------------------------------|
//! | `Vector`      | buffer start       | `u32` length, then the bytes           |
//! | `Table`       | parent table start | a nested table                         |
//! | `TableArray`  | parent table start | `u32` count, then one offset per table |
//!
//! Every integer is little-endian. The encoder knows nothing about
//! transactions; adding a transaction kind means adding a schema.
//!
//! The offset table is an intermediate form. [`flatten`] rewrites it into
//! the flat layout nodes sign and accept: every field in schema order,
//! vectors as raw bytes, nested tables inline, table arrays as their
//! elements back to back, no offsets and no padding. A flat vector's
//! length and a flat table array's element count are read from sibling
//! scalars named by [`Len`] and [`Count`]; [`parse`] reads the flat form
//! back.

pub mod decoder;
pub mod encoder;
pub mod flat;

use std::collections::BTreeMap;
use thiserror::Error;

pub use decoder::{decode, Decoded};
pub use encoder::encode;
pub use flat::{flatten, parse};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A buffer or field set does not fit its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("buffer truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("field `{field}` points to offset {offset}, outside its table")]
    InvalidOffset { field: &'static str, offset: usize },

    #[error("missing value for field `{field}`")]
    MissingField { field: &'static str },

    #[error("value for field `{field}` does not match its schema kind")]
    KindMismatch { field: &'static str },

    #[error("field `{field}` expects {expected} bytes, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("value {value} does not fit field `{field}`")]
    ValueOutOfRange { field: &'static str, value: u64 },

    #[error("content exceeds the 32-bit offset range")]
    TooLarge,

    #[error("declared size {declared} does not match buffer length {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("unknown transaction type 0x{0:04X}")]
    UnknownTransactionType(u16),

    #[error("{count} unexpected trailing bytes")]
    TrailingBytes { count: usize },

    #[error("invalid value in field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Schema description
// ---------------------------------------------------------------------------

/// Width of an inline unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
    U32,
    U64,
}

impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 => 2,
            Width::U32 => 4,
            Width::U64 => 8,
        }
    }

    /// Largest value the width can hold.
    pub const fn max_value(self) -> u64 {
        match self {
            Width::U8 => u8::MAX as u64,
            Width::U16 => u16::MAX as u64,
            Width::U32 => u32::MAX as u64,
            Width::U64 => u64::MAX,
        }
    }
}

/// Where the flat form keeps a vector's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Len {
    /// The value of the named scalar minus `bias`. The scalar is looked up
    /// in the vector's own table first, then in enclosing tables.
    Field { name: &'static str, bias: usize },
    /// Everything up to the end of the parsed region.
    Rest,
}

impl Len {
    pub const fn of(name: &'static str) -> Self {
        Len::Field { name, bias: 0 }
    }
}

/// Where the flat form keeps a table array's element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// The value of the named scalar, looked up like [`Len::Field`].
    Field(&'static str),
    /// Elements follow each other up to the end of the parsed region.
    Rest,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Fixed-width unsigned integer, inline.
    Scalar(Width),
    /// Fixed-length byte array, inline.
    Array(usize),
    /// Length-prefixed bytes behind an offset from the buffer start.
    Vector(Len),
    /// Nested table behind an offset from the parent table start.
    Table(&'static Schema),
    /// Counted list of nested tables behind an offset from the parent
    /// table start.
    TableArray(&'static Schema, Count),
}

impl FieldKind {
    /// Bytes the field occupies in its table's inline region.
    pub const fn inline_size(&self) -> usize {
        match self {
            FieldKind::Scalar(width) => width.bytes(),
            FieldKind::Array(len) => *len,
            FieldKind::Vector(_) | FieldKind::Table(_) | FieldKind::TableArray(..) => 4,
        }
    }
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn scalar(name: &'static str, width: Width) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar(width),
        }
    }

    pub const fn array(name: &'static str, len: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Array(len),
        }
    }

    pub const fn vector(name: &'static str, len: Len) -> Self {
        Self {
            name,
            kind: FieldKind::Vector(len),
        }
    }

    pub const fn table(name: &'static str, schema: &'static Schema) -> Self {
        Self {
            name,
            kind: FieldKind::Table(schema),
        }
    }

    pub const fn table_array(name: &'static str, schema: &'static Schema, count: Count) -> Self {
        Self {
            name,
            kind: FieldKind::TableArray(schema, count),
        }
    }
}

/// A named, ordered field list.
///
/// Several schemas can be laid out back to back as one table by passing
/// them together to [`encode`] / [`decode`] / [`parse`]; transactions use this to put
/// the shared header in front of the kind-specific body.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn inline_size(&self) -> usize {
        self.fields.iter().map(|f| f.kind.inline_size()).sum()
    }

    /// Offset of `name` from the start of the schema's inline region.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for field in self.fields {
            if field.name == name {
                return Some(offset);
            }
            offset += field.kind.inline_size();
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(u64),
    Array(Vec<u8>),
    Vector(Vec<u8>),
    Table(FieldSet),
    TableArray(Vec<FieldSet>),
}

/// Values keyed by field name, filled by callers before encoding and by
/// the decoder afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeMap<&'static str, Value>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    pub fn with(mut self, name: &'static str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_scalar(self, name: &'static str, value: u64) -> Self {
        self.with(name, Value::Scalar(value))
    }

    pub fn with_array(self, name: &'static str, bytes: &[u8]) -> Self {
        self.with(name, Value::Array(bytes.to_vec()))
    }

    pub fn with_vector(self, name: &'static str, bytes: &[u8]) -> Self {
        self.with(name, Value::Vector(bytes.to_vec()))
    }

    pub fn with_table(self, name: &'static str, table: FieldSet) -> Self {
        self.with(name, Value::Table(table))
    }

    pub fn with_table_array(self, name: &'static str, tables: Vec<FieldSet>) -> Self {
        self.with(name, Value::TableArray(tables))
    }

    /// Adds every value of `other`, replacing values with the same name.
    pub fn merge(mut self, other: FieldSet) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &'static str) -> Result<&Value, EncodingError> {
        self.values
            .get(name)
            .ok_or(EncodingError::MissingField { field: name })
    }

    pub fn scalar(&self, name: &'static str) -> Result<u64, EncodingError> {
        match self.get(name)? {
            Value::Scalar(value) => Ok(*value),
            _ => Err(EncodingError::KindMismatch { field: name }),
        }
    }

    /// Reads a scalar and narrows it, e.g. `fields.scalar_as::<u8>("flags")`.
    pub fn scalar_as<T: TryFrom<u64>>(&self, name: &'static str) -> Result<T, EncodingError> {
        let value = self.scalar(name)?;
        T::try_from(value).map_err(|_| EncodingError::ValueOutOfRange { field: name, value })
    }

    pub fn array(&self, name: &'static str) -> Result<&[u8], EncodingError> {
        match self.get(name)? {
            Value::Array(bytes) => Ok(bytes),
            _ => Err(EncodingError::KindMismatch { field: name }),
        }
    }

    pub fn array_fixed<const N: usize>(&self, name: &'static str) -> Result<[u8; N], EncodingError> {
        let bytes = self.array(name)?;
        bytes.try_into().map_err(|_| EncodingError::LengthMismatch {
            field: name,
            expected: N,
            actual: bytes.len(),
        })
    }

    pub fn vector(&self, name: &'static str) -> Result<&[u8], EncodingError> {
        match self.get(name)? {
            Value::Vector(bytes) => Ok(bytes),
            _ => Err(EncodingError::KindMismatch { field: name }),
        }
    }

    pub fn table(&self, name: &'static str) -> Result<&FieldSet, EncodingError> {
        match self.get(name)? {
            Value::Table(table) => Ok(table),
            _ => Err(EncodingError::KindMismatch { field: name }),
        }
    }

    pub fn table_array(&self, name: &'static str) -> Result<&[FieldSet], EncodingError> {
        match self.get(name)? {
            Value::TableArray(tables) => Ok(tables),
            _ => Err(EncodingError::KindMismatch { field: name }),
        }
    }
}
