//! Slice-based decoder implementation.

use either::Either::{Left, Right};

use crate::sans::{
    self, FieldKind, Value,
    field::FieldError,
    record::End,
};

use super::FromRecord;

/// Decode a record from a slice, publishing to a receiver.
///
/// Every field is bounds-checked before the first value is published, so a
/// receiver never observes part of a truncated record. Bytes after the last
/// field are ignored.
///
/// Returns the number of bytes the schema covered.
///
/// This method is also re-exported as `packlog::avec::decode_slice`.
pub fn decode(
    r: &[u8],
    schema: &[FieldKind],
    o: &mut impl FromRecord,
) -> Result<usize, FieldError> {
    check(r, schema)?;

    let mut state = sans::decoder(schema);

    let end = loop {
        state = match state {
            Left(field) => {
                let index = field.index();
                let (value, successor) = field.advance(r)?;
                publish(o, index, value);
                successor
            }
            Right(end) => break end,
        };
    };

    Ok(end.consumed())
}

/// Walk a schema over a slice without decoding, failing at the first field
/// that does not fit.
pub fn check(r: &[u8], schema: &[FieldKind]) -> Result<End, FieldError> {
    let mut state = sans::decoder(schema);

    loop {
        state = match state {
            Left(field) => field.skip(r)?,
            Right(end) => return Ok(end),
        };
    }
}

/// Publish a decoded value to the receiver method for its type.
pub fn publish<O: FromRecord + ?Sized>(o: &mut O, field: usize, value: Value) {
    match value {
        Value::UInt256(v) | Value::UInt160(v) => o.add_u256(field, v),
        Value::Int256(v) => o.add_i256(field, v),
        Value::UInt128(v) => o.add_u128(field, v),
        Value::Address(v) => o.add_address(field, v),
        Value::Int24(v) => o.add_i32(field, v),
        Value::Bool(v) => o.add_bool(field, v),
    }
}
