//! Bytes → field set.
//!
//! Every offset is checked before it is followed: it must land at or past
//! the end of the inline region of the table that holds it and inside the
//! buffer. Every length and count is checked against the bytes that are
//! actually there before anything is allocated.

use tracing::trace;

use super::{EncodingError, FieldKind, FieldSet, Schema, Value, Width};

/// A decoded table and the number of bytes the schema accounts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub fields: FieldSet,
    /// One past the last byte any field read. Anything beyond is not
    /// described by the schema.
    pub extent: usize,
}

/// Decodes the table at the start of `bytes`, laid out by `schemas`.
pub fn decode(schemas: &[&Schema], bytes: &[u8]) -> Result<Decoded, EncodingError> {
    let mut reader = Reader { bytes, extent: 0 };
    let fields = reader.read_table(schemas, 0)?;
    trace!(
        schema = schemas.last().map(|s| s.name).unwrap_or(""),
        extent = reader.extent,
        available = bytes.len(),
        "decoded table"
    );
    Ok(Decoded {
        fields,
        extent: reader.extent,
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    extent: usize,
}

impl<'a> Reader<'a> {
    fn read_table(&mut self, schemas: &[&Schema], table_start: usize) -> Result<FieldSet, EncodingError> {
        let inline_size: usize = schemas.iter().map(|s| s.inline_size()).sum();
        let inline_end = table_start
            .checked_add(inline_size)
            .ok_or(EncodingError::TooLarge)?;
        self.take(table_start, inline_size)?;

        let mut fields = FieldSet::new();
        let mut cursor = table_start;
        for schema in schemas {
            for field in schema.fields {
                let value = match field.kind {
                    FieldKind::Scalar(width) => Value::Scalar(self.read_scalar(cursor, width)?),
                    FieldKind::Array(len) => Value::Array(self.take(cursor, len)?.to_vec()),
                    FieldKind::Vector(_) => {
                        let at = self.read_offset(field.name, cursor, 0, inline_end)?;
                        let len = self.read_u32(at)? as usize;
                        Value::Vector(self.take(at + 4, len)?.to_vec())
                    }
                    FieldKind::Table(nested) => {
                        let at = self.read_offset(field.name, cursor, table_start, inline_end)?;
                        Value::Table(self.read_table(&[nested], at)?)
                    }
                    FieldKind::TableArray(nested, _) => {
                        let at = self.read_offset(field.name, cursor, table_start, inline_end)?;
                        let count = self.read_u32(at)? as usize;
                        let slots_len = count.checked_mul(4).ok_or(EncodingError::TooLarge)?;
                        self.take(at + 4, slots_len)?;
                        let slots_end = at + 4 + slots_len;

                        let mut elements = Vec::with_capacity(count);
                        for i in 0..count {
                            let element =
                                self.read_offset(field.name, at + 4 + 4 * i, table_start, slots_end)?;
                            elements.push(self.read_table(&[nested], element)?);
                        }
                        Value::TableArray(elements)
                    }
                };
                fields.insert(field.name, value);
                cursor += field.kind.inline_size();
            }
        }
        Ok(fields)
    }

    /// Returns `len` bytes at `at`, extending the extent over them.
    fn take(&mut self, at: usize, len: usize) -> Result<&'a [u8], EncodingError> {
        let bytes = self.bytes;
        let end = at.checked_add(len).ok_or(EncodingError::TooLarge)?;
        if end > bytes.len() {
            return Err(EncodingError::Truncated {
                needed: end,
                available: bytes.len(),
            });
        }
        self.extent = self.extent.max(end);
        Ok(&bytes[at..end])
    }

    fn read_scalar(&mut self, at: usize, width: Width) -> Result<u64, EncodingError> {
        let raw = self.take(at, width.bytes())?;
        let mut buf = [0u8; 8];
        buf[..raw.len()].copy_from_slice(raw);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_u32(&mut self, at: usize) -> Result<u32, EncodingError> {
        self.read_scalar(at, Width::U32).map(|v| v as u32)
    }

    /// Reads the offset in the slot at `slot`, rebased on `base`, and
    /// checks it lands in `[floor, len)`.
    fn read_offset(
        &mut self,
        field: &'static str,
        slot: usize,
        base: usize,
        floor: usize,
    ) -> Result<usize, EncodingError> {
        let raw = self.read_u32(slot)? as usize;
        let offset = base.checked_add(raw).ok_or(EncodingError::TooLarge)?;
        if offset < floor || offset >= self.bytes.len() {
            return Err(EncodingError::InvalidOffset { field, offset });
        }
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{encode, Count, Field, Len};
    use super::*;

    static ITEM: Schema = Schema {
        name: "item",
        fields: &[Field::scalar("value", Width::U64)],
    };

    static INFO: Schema = Schema {
        name: "info",
        fields: &[Field::scalar("type", Width::U8), Field::vector("payload", Len::Rest)],
    };

    static RECORD: Schema = Schema {
        name: "record",
        fields: &[
            Field::scalar("flags", Width::U16),
            Field::array("key", 4),
            Field::table_array("items", &ITEM, Count::Rest),
            Field::table("info", &INFO),
        ],
    };

    fn sample() -> FieldSet {
        FieldSet::new()
            .with_scalar("flags", 0xBEEF)
            .with_array("key", b"abcd")
            .with_table_array(
                "items",
                vec![
                    FieldSet::new().with_scalar("value", 1),
                    FieldSet::new().with_scalar("value", u64::MAX),
                ],
            )
            .with_table(
                "info",
                FieldSet::new()
                    .with_scalar("type", 1)
                    .with_vector("payload", b"payload"),
            )
    }

    #[test]
    fn test_decode_mirrors_encode() {
        let bytes = encode(&[&RECORD], &sample()).unwrap();
        let decoded = decode(&[&RECORD], &bytes).unwrap();
        assert_eq!(decoded.fields, sample());
        assert_eq!(decoded.extent, bytes.len());
    }

    #[test]
    fn test_extent_excludes_trailing_bytes() {
        let mut bytes = encode(&[&RECORD], &sample()).unwrap();
        let len = bytes.len();
        bytes.extend_from_slice(&[9; 10]);
        assert_eq!(decode(&[&RECORD], &bytes).unwrap().extent, len);
    }

    #[test]
    fn test_every_truncation_is_an_error() {
        let bytes = encode(&[&RECORD], &sample()).unwrap();
        for cut in 0..bytes.len() {
            let err = decode(&[&RECORD], &bytes[..cut]).unwrap_err();
            assert!(
                matches!(
                    err,
                    EncodingError::Truncated { .. } | EncodingError::InvalidOffset { .. }
                ),
                "cut at {cut}: {err:?}"
            );
        }
    }

    #[test]
    fn test_offset_into_inline_region_rejected() {
        let mut bytes = encode(&[&RECORD], &sample()).unwrap();
        // items slot sits after flags(2) and key(4)
        bytes[6..10].copy_from_slice(&2u32.to_le_bytes());
        assert_eq!(
            decode(&[&RECORD], &bytes).unwrap_err(),
            EncodingError::InvalidOffset {
                field: "items",
                offset: 2
            }
        );
    }

    #[test]
    fn test_huge_count_rejected_without_allocating() {
        let mut bytes = encode(&[&RECORD], &sample()).unwrap();
        let at = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
        bytes[at..at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode(&[&RECORD], &bytes).unwrap_err(),
            EncodingError::Truncated { .. }
        ));
    }
}
