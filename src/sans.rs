//! Allocation-free core for decoding packed records.
//!
//! This module is intended for applications that manage their own buffers or
//! run without an allocator. See [`crate::avec`] for implementations covering
//! common decoding patterns.
//!
//! # Architecture
//!
//! A record is a byte buffer holding fields packed back to back in big-endian
//! order, with no padding between them and no length prefixes. Its layout is
//! given entirely by a schema: an ordered slice of [`FieldKind`]s, each with a
//! fixed width.
//!
//! [`field::decode_field`] reads one field at a given offset. The [`record`]
//! module walks a whole record with a state token per field; once enough
//! bytes are ready, call the token's `advance` method to receive the decoded
//! value and a successor token. The terminal [`record::End`] token reports how
//! many bytes the schema covered. Bytes after that point are left untouched.
//!
//! 256-bit quantities are represented by the fixed-width integers in [`word`],
//! which render exactly in base 10.

pub mod field;
pub mod record;
pub mod word;

pub use field::{FieldKind, Value};

/// Entrypoint to the record state machine.
pub use record::begin as decoder;
