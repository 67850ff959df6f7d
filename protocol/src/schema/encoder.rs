//! Field set → bytes.
//!
//! Encoding is two passes per table. The inline pass writes scalars and
//! arrays in place and reserves a zeroed 4-byte slot for every variable
//! field, remembering the slot by its index in the buffer. The tail pass
//! then appends each variable field's content (aligned to
//! [`SCHEMA_ALIGNMENT`]) and backpatches its slot.

use tracing::trace;

use super::{EncodingError, Field, FieldKind, FieldSet, Schema, Value, Width};
use crate::config::SCHEMA_ALIGNMENT;

/// Encodes `fields` as one table laid out by `schemas` in order.
///
/// Fails if a field has no value, a value of the wrong kind, a scalar
/// that does not fit its width, or an array of the wrong length.
pub fn encode(schemas: &[&Schema], fields: &FieldSet) -> Result<Vec<u8>, EncodingError> {
    let mut encoder = Encoder::default();
    encoder.write_table(schemas, fields)?;
    trace!(
        schema = schemas.last().map(|s| s.name).unwrap_or(""),
        size = encoder.buf.len(),
        "encoded table"
    );
    Ok(encoder.buf)
}

/// An offset slot waiting for its content's position.
struct PendingSlot<'a> {
    slot: usize,
    field: &'static Field,
    value: &'a Value,
}

#[derive(Default)]
struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Writes one table and returns its start position.
    fn write_table(&mut self, schemas: &[&Schema], fields: &FieldSet) -> Result<usize, EncodingError> {
        let table_start = self.buf.len();
        let mut pending = Vec::new();

        for schema in schemas {
            for field in schema.fields {
                let value = fields.get(field.name)?;
                match (&field.kind, value) {
                    (FieldKind::Scalar(width), Value::Scalar(v)) => {
                        self.write_scalar(field.name, *width, *v)?;
                    }
                    (FieldKind::Array(len), Value::Array(bytes)) => {
                        if bytes.len() != *len {
                            return Err(EncodingError::LengthMismatch {
                                field: field.name,
                                expected: *len,
                                actual: bytes.len(),
                            });
                        }
                        self.buf.extend_from_slice(bytes);
                    }
                    (FieldKind::Vector(_), Value::Vector(_))
                    | (FieldKind::Table(_), Value::Table(_))
                    | (FieldKind::TableArray(..), Value::TableArray(_)) => {
                        pending.push(PendingSlot {
                            slot: self.reserve_slot(),
                            field,
                            value,
                        });
                    }
                    _ => return Err(EncodingError::KindMismatch { field: field.name }),
                }
            }
        }

        for PendingSlot { slot, field, value } in pending {
            self.align();
            match (&field.kind, value) {
                (FieldKind::Vector(_), Value::Vector(bytes)) => {
                    let start = self.buf.len();
                    self.write_u32(to_u32(bytes.len())?);
                    self.buf.extend_from_slice(bytes);
                    self.patch(slot, start)?;
                }
                (FieldKind::Table(schema), Value::Table(nested)) => {
                    let start = self.write_table(&[*schema], nested)?;
                    self.patch(slot, start - table_start)?;
                }
                (FieldKind::TableArray(schema, _), Value::TableArray(elements)) => {
                    let start = self.buf.len();
                    self.write_u32(to_u32(elements.len())?);
                    let element_slots: Vec<usize> =
                        elements.iter().map(|_| self.reserve_slot()).collect();
                    for (element_slot, element) in element_slots.into_iter().zip(elements) {
                        self.align();
                        let element_start = self.write_table(&[*schema], element)?;
                        self.patch(element_slot, element_start - table_start)?;
                    }
                    self.patch(slot, start - table_start)?;
                }
                _ => return Err(EncodingError::KindMismatch { field: field.name }),
            }
        }

        Ok(table_start)
    }

    fn write_scalar(&mut self, field: &'static str, width: Width, value: u64) -> Result<(), EncodingError> {
        if value > width.max_value() {
            return Err(EncodingError::ValueOutOfRange { field, value });
        }
        self.buf
            .extend_from_slice(&value.to_le_bytes()[..width.bytes()]);
        Ok(())
    }

    fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn reserve_slot(&mut self) -> usize {
        let slot = self.buf.len();
        self.buf.extend_from_slice(&[0u8; 4]);
        slot
    }

    fn patch(&mut self, slot: usize, offset: usize) -> Result<(), EncodingError> {
        let bytes = to_u32(offset)?.to_le_bytes();
        self.buf[slot..slot + 4].copy_from_slice(&bytes);
        Ok(())
    }

    fn align(&mut self) {
        let padding = (SCHEMA_ALIGNMENT - self.buf.len() % SCHEMA_ALIGNMENT) % SCHEMA_ALIGNMENT;
        self.buf.resize(self.buf.len() + padding, 0);
    }
}

fn to_u32(value: usize) -> Result<u32, EncodingError> {
    u32::try_from(value).map_err(|_| EncodingError::TooLarge)
}

#[cfg(test)]
mod tests {
    use super::super::{Count, Len};
    use super::*;

    static ENTRY: Schema = Schema {
        name: "entry",
        fields: &[Field::scalar("id", Width::U16), Field::vector("label", Len::Rest)],
    };

    static HEADER: Schema = Schema {
        name: "header",
        fields: &[Field::scalar("kind", Width::U8), Field::array("tag", 2)],
    };

    static BODY: Schema = Schema {
        name: "body",
        fields: &[
            Field::scalar("amount", Width::U32),
            Field::vector("note", Len::Rest),
            Field::table_array("entries", &ENTRY, Count::Rest),
        ],
    };

    #[test]
    fn test_scalars_are_little_endian() {
        let bytes = encode(
            &[&HEADER],
            &FieldSet::new()
                .with_scalar("kind", 0xAB)
                .with_array("tag", &[1, 2]),
        )
        .unwrap();
        assert_eq!(bytes, vec![0xAB, 1, 2]);
    }

    #[test]
    fn test_layout_with_offsets_and_padding() {
        let fields = FieldSet::new()
            .with_scalar("kind", 7)
            .with_array("tag", &[0xEE, 0xFF])
            .with_scalar("amount", 0x0102_0304)
            .with_vector("note", b"hi")
            .with_table_array(
                "entries",
                vec![FieldSet::new()
                    .with_scalar("id", 0x0506)
                    .with_vector("label", b"x")],
            );
        let bytes = encode(&[&HEADER, &BODY], &fields).unwrap();

        let expected: Vec<u8> = [
            // inline: kind, tag, amount, note slot, entries slot
            &[7, 0xEE, 0xFF][..],
            &[4, 3, 2, 1],
            &[16, 0, 0, 0],
            &[24, 0, 0, 0],
            // 15: pad to 16, note vector
            &[0],
            &[2, 0, 0, 0, b'h', b'i'],
            // 22: pad to 24, entries: count, element offset
            &[0, 0],
            &[1, 0, 0, 0, 32, 0, 0, 0],
            // 32: entry table: id, label slot, pad, label vector
            &[6, 5, 40, 0, 0, 0],
            &[0, 0],
            &[1, 0, 0, 0, b'x'],
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_missing_and_mismatched_fields() {
        let err = encode(&[&HEADER], &FieldSet::new().with_scalar("kind", 1)).unwrap_err();
        assert_eq!(err, EncodingError::MissingField { field: "tag" });

        let err = encode(
            &[&HEADER],
            &FieldSet::new()
                .with_vector("kind", b"a")
                .with_array("tag", &[0, 0]),
        )
        .unwrap_err();
        assert_eq!(err, EncodingError::KindMismatch { field: "kind" });
    }

    #[test]
    fn test_out_of_range_and_wrong_length() {
        let err = encode(
            &[&HEADER],
            &FieldSet::new()
                .with_scalar("kind", 256)
                .with_array("tag", &[0, 0]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EncodingError::ValueOutOfRange {
                field: "kind",
                value: 256
            }
        );

        let err = encode(
            &[&HEADER],
            &FieldSet::new()
                .with_scalar("kind", 1)
                .with_array("tag", &[0, 0, 0]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EncodingError::LengthMismatch {
                field: "tag",
                expected: 2,
                actual: 3
            }
        );
    }
}
