//! States walking a record against its schema.

use either::Either::{self, Left, Right};

use super::field::{FieldError, FieldKind, Value, decode_field};

/// Begin walking a record laid out by a schema.
///
/// Returns the state for the first field, or the terminal state for an empty
/// schema.
pub fn begin(schema: &[FieldKind]) -> Either<Field<'_>, End> {
    Field {
        schema,
        index: 0,
        offset: 0,
    }
    .or_end()
}

/// Total number of bytes occupied by a record of this schema.
pub fn width(schema: &[FieldKind]) -> usize {
    schema.iter().map(|k| k.width()).sum()
}

/// State token to decode the next field of a record.
#[derive(Debug)]
pub struct Field<'s> {
    schema: &'s [FieldKind],
    index: usize,
    offset: usize,
}

impl<'s> Field<'s> {
    /// Kind of the field to be decoded.
    pub fn kind(&self) -> FieldKind {
        self.schema[self.index]
    }

    /// Position of the field within the schema.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset of the field within the record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Transition to another state by decoding this field.
    ///
    /// `r` holds the whole record, not just the bytes of this field.
    ///
    /// Returns the decoded value and a successor state token.
    pub fn advance(self, r: &[u8]) -> Result<(Value, Either<Self, End>), FieldError> {
        let (value, width) = decode_field(r, self.offset, self.kind())?;
        Ok((value, self.successor(width)))
    }

    /// Transition to another state without decoding, only checking that this
    /// field lies within the record.
    pub fn skip(self, r: &[u8]) -> Result<Either<Self, End>, FieldError> {
        let width = self.kind().width();

        if self.offset.checked_add(width).is_none_or(|end| end > r.len()) {
            Err(FieldError::OutOfBounds {
                offset: self.offset,
                width,
                len: r.len(),
            })?;
        }

        Ok(self.successor(width))
    }

    fn successor(self, width: usize) -> Either<Self, End> {
        Self {
            schema: self.schema,
            index: self.index + 1,
            offset: self.offset + width,
        }
        .or_end()
    }

    fn or_end(self) -> Either<Self, End> {
        if self.index < self.schema.len() {
            Left(self)
        } else {
            Right(End {
                consumed: self.offset,
            })
        }
    }
}

/// Terminal state, reached once every field of the schema has been decoded.
#[derive(Debug)]
pub struct End {
    consumed: usize,
}

impl End {
    /// Number of record bytes covered by the schema. Any bytes beyond this are
    /// trailing padding.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}
