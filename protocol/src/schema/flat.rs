//! Offset table → flat bytes, and flat bytes → field set.
//!
//! [`flatten`] walks a table produced by [`encode`](super::encode) and
//! writes every field in schema order with nothing in between. Lengths and
//! counts are not written by this pass: they are ordinary scalars of the
//! schema, and flattening checks that each one agrees with the content it
//! describes. [`parse`] reads them to find where each variable field ends.

use tracing::trace;

use super::{decode, Count, Decoded, EncodingError, FieldKind, FieldSet, Len, Schema, Value, Width};

/// Rewrites the offset table at the start of `table` into its flat form.
pub fn flatten(schemas: &[&Schema], table: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let decoded = decode(schemas, table)?;
    let mut out = Vec::with_capacity(decoded.extent);
    write_table(&mut out, schemas, &decoded.fields, None)?;
    trace!(
        schema = schemas.last().map(|s| s.name).unwrap_or(""),
        table = decoded.extent,
        flat = out.len(),
        "flattened table"
    );
    Ok(out)
}

/// Parses the flat table at the start of `bytes`.
///
/// [`Len::Rest`] and [`Count::Rest`] run to the end of `bytes`, so callers
/// pass exactly the region the table may occupy.
pub fn parse(schemas: &[&Schema], bytes: &[u8]) -> Result<Decoded, EncodingError> {
    let mut parser = Parser { bytes, cursor: 0 };
    let fields = parser.read_table(schemas, None)?;
    trace!(
        schema = schemas.last().map(|s| s.name).unwrap_or(""),
        extent = parser.cursor,
        available = bytes.len(),
        "parsed flat table"
    );
    Ok(Decoded {
        fields,
        extent: parser.cursor,
    })
}

/// The fields a length or count can name: the table being walked, then
/// its ancestors.
struct Scope<'a> {
    fields: &'a FieldSet,
    parent: Option<&'a Scope<'a>>,
}

impl Scope<'_> {
    fn lookup(&self, name: &'static str) -> Result<u64, EncodingError> {
        match self.fields.scalar(name) {
            Err(EncodingError::MissingField { .. }) => match self.parent {
                Some(parent) => parent.lookup(name),
                None => Err(EncodingError::MissingField { field: name }),
            },
            found => found,
        }
    }

    fn declared_len(&self, field: &'static str, name: &'static str, bias: usize) -> Result<usize, EncodingError> {
        let value = self.lookup(name)?;
        let len = usize::try_from(value).map_err(|_| EncodingError::TooLarge)?;
        len.checked_sub(bias).ok_or_else(|| EncodingError::InvalidField {
            field,
            reason: format!("`{name}` is {value}, below its minimum of {bias}"),
        })
    }

    fn declared_count(&self, name: &'static str) -> Result<usize, EncodingError> {
        usize::try_from(self.lookup(name)?).map_err(|_| EncodingError::TooLarge)
    }
}

fn write_table(
    out: &mut Vec<u8>,
    schemas: &[&Schema],
    fields: &FieldSet,
    parent: Option<&Scope<'_>>,
) -> Result<(), EncodingError> {
    let scope = Scope { fields, parent };
    for schema in schemas {
        for field in schema.fields {
            match (&field.kind, fields.get(field.name)?) {
                (FieldKind::Scalar(width), Value::Scalar(value)) => {
                    if *value > width.max_value() {
                        return Err(EncodingError::ValueOutOfRange {
                            field: field.name,
                            value: *value,
                        });
                    }
                    out.extend_from_slice(&value.to_le_bytes()[..width.bytes()]);
                }
                (FieldKind::Array(len), Value::Array(bytes)) => {
                    if bytes.len() != *len {
                        return Err(EncodingError::LengthMismatch {
                            field: field.name,
                            expected: *len,
                            actual: bytes.len(),
                        });
                    }
                    out.extend_from_slice(bytes);
                }
                (FieldKind::Vector(len), Value::Vector(bytes)) => {
                    if let Len::Field { name, bias } = *len {
                        let expected = scope.declared_len(field.name, name, bias)?;
                        if expected != bytes.len() {
                            return Err(EncodingError::LengthMismatch {
                                field: field.name,
                                expected,
                                actual: bytes.len(),
                            });
                        }
                    }
                    out.extend_from_slice(bytes);
                }
                (FieldKind::Table(nested), Value::Table(table)) => {
                    write_table(out, &[*nested], table, Some(&scope))?;
                }
                (FieldKind::TableArray(nested, count), Value::TableArray(elements)) => {
                    if let Count::Field(name) = *count {
                        let expected = scope.declared_count(name)?;
                        if expected != elements.len() {
                            return Err(EncodingError::LengthMismatch {
                                field: field.name,
                                expected,
                                actual: elements.len(),
                            });
                        }
                    }
                    for element in elements {
                        write_table(out, &[*nested], element, Some(&scope))?;
                    }
                }
                _ => return Err(EncodingError::KindMismatch { field: field.name }),
            }
        }
    }
    Ok(())
}

struct Parser<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn read_table(&mut self, schemas: &[&Schema], parent: Option<&Scope<'_>>) -> Result<FieldSet, EncodingError> {
        let mut fields = FieldSet::new();
        for schema in schemas {
            for field in schema.fields {
                let value = match field.kind {
                    FieldKind::Scalar(width) => Value::Scalar(self.read_scalar(width)?),
                    FieldKind::Array(len) => Value::Array(self.take(len)?.to_vec()),
                    FieldKind::Vector(len) => {
                        let len = match len {
                            Len::Field { name, bias } => {
                                let scope = Scope { fields: &fields, parent };
                                scope.declared_len(field.name, name, bias)?
                            }
                            Len::Rest => self.remaining(),
                        };
                        Value::Vector(self.take(len)?.to_vec())
                    }
                    FieldKind::Table(nested) => {
                        let scope = Scope { fields: &fields, parent };
                        Value::Table(self.read_table(&[nested], Some(&scope))?)
                    }
                    FieldKind::TableArray(nested, count) => {
                        let scope = Scope { fields: &fields, parent };
                        let mut elements = Vec::new();
                        match count {
                            Count::Field(name) => {
                                // Every element consumes bytes, so a bogus count
                                // runs out of buffer before it runs out of memory.
                                for _ in 0..scope.declared_count(name)? {
                                    elements.push(self.read_table(&[nested], Some(&scope))?);
                                }
                            }
                            Count::Rest => {
                                while self.remaining() > 0 {
                                    let start = self.cursor;
                                    elements.push(self.read_table(&[nested], Some(&scope))?);
                                    if self.cursor == start {
                                        return Err(EncodingError::InvalidField {
                                            field: field.name,
                                            reason: "element occupies no bytes".into(),
                                        });
                                    }
                                }
                            }
                        }
                        Value::TableArray(elements)
                    }
                };
                fields.insert(field.name, value);
            }
        }
        Ok(fields)
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], EncodingError> {
        let bytes = self.bytes;
        let end = self.cursor.checked_add(len).ok_or(EncodingError::TooLarge)?;
        if end > bytes.len() {
            return Err(EncodingError::Truncated {
                needed: end,
                available: bytes.len(),
            });
        }
        let taken = &bytes[self.cursor..end];
        self.cursor = end;
        Ok(taken)
    }

    fn read_scalar(&mut self, width: Width) -> Result<u64, EncodingError> {
        let raw = self.take(width.bytes())?;
        let mut buf = [0u8; 8];
        buf[..raw.len()].copy_from_slice(raw);
        Ok(u64::from_le_bytes(buf))
    }
}
