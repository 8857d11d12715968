//! Hex-encoded records and their rendering as log rows.
//!
//! _Requires Cargo feature `std`._

use std::{
    string::{String, ToString},
    vec::Vec,
};

use either::Either::{Left, Right};
use thiserror::Error;

use crate::{
    sans::{self, FieldKind, Value, field::FieldError},
    schema::Dataset,
};

/// Errors occurring while decoding a textual record.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not a valid hex string.
    #[error("Malformed hex input: {0}.")]
    MalformedInput(#[from] hex::FromHexError),
    /// The record is shorter than its schema.
    #[error("Field of {width} bytes at offset {offset} exceeds the record of {len} bytes.")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },
    /// A schema names a field kind that cannot be decoded.
    #[error("Unsupported field kind `{0}`.")]
    UnsupportedKind(String),
    /// No schema is registered under a name.
    #[error("Unknown schema `{0}`.")]
    UnknownSchema(String),
}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::OutOfBounds { offset, width, len } => {
                Self::OutOfBounds { offset, width, len }
            }
        }
    }
}

/// Convert a hex string to bytes. A leading `0x` is ignored.
pub fn parse_hex(s: &str) -> Result<Vec<u8>, Error> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

/// Build a schema from Solidity type names.
pub fn parse_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Result<Vec<FieldKind>, Error> {
    tags.into_iter()
        .map(|tag| FieldKind::from_tag(tag).ok_or_else(|| Error::UnsupportedKind(tag.to_string())))
        .collect()
}

/// Look up a registered dataset by name.
pub fn lookup(name: &str) -> Result<Dataset, Error> {
    Dataset::from_name(name).ok_or_else(|| Error::UnknownSchema(name.to_string()))
}

/// Decode every field of a record from a slice.
///
/// Fails at the first field extending past the end of the slice, discarding
/// any values decoded before it. Bytes after the last field are ignored.
///
/// This method is also re-exported as `packlog::avec::decode_record`.
pub fn decode_record(r: &[u8], schema: &[FieldKind]) -> Result<Vec<Value>, Error> {
    let mut values = Vec::with_capacity(schema.len());
    let mut state = sans::decoder(schema);

    loop {
        state = match state {
            Left(field) => {
                let (value, successor) = field.advance(r)?;
                values.push(value);
                successor
            }
            Right(_) => break Ok(values),
        };
    }
}

/// Decode every field of a hex-encoded record.
///
/// Malformed hex is rejected before any field is decoded.
pub fn decode_hex(s: &str, schema: &[FieldKind]) -> Result<Vec<Value>, Error> {
    decode_record(&parse_hex(s)?, schema)
}

/// Render values as a comma-separated, newline-terminated row.
///
/// No token can contain a comma, so nothing is quoted or escaped.
///
/// This method is also re-exported as `packlog::avec::render_row`.
pub fn render_row(values: &[Value]) -> String {
    join_line(values.iter().map(ToString::to_string))
}

/// Render column names as a header row.
pub fn render_header(columns: &[&str]) -> String {
    join_line(columns.iter().copied().map(String::from))
}

fn join_line(tokens: impl Iterator<Item = String>) -> String {
    let mut line = tokens.collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}
