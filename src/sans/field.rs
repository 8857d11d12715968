//! Decoding of individual packed fields.

use core::fmt;

use tartan_bitfield::bitfield;
use thiserror::Error;

use super::word::{Address, I256, U256};

/// The scalar encodings a packed record may contain.
///
/// Every kind has a fixed width; see [`FieldKind::width`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `uint256`, 32 bytes.
    UInt256,
    /// `int256`, 32 bytes, two's complement.
    Int256,
    /// `uint160`, 20 bytes.
    UInt160,
    /// `uint128`, 16 bytes.
    UInt128,
    /// `address`, 20 bytes.
    Address,
    /// `int24`, 3 bytes, two's complement.
    Int24,
    /// `bool`, 1 byte.
    Bool,
}

impl FieldKind {
    /// Number of bytes occupied by a field of this kind.
    pub const fn width(self) -> usize {
        match self {
            Self::UInt256 | Self::Int256 => 32,
            Self::UInt160 | Self::Address => 20,
            Self::UInt128 => 16,
            Self::Int24 => 3,
            Self::Bool => 1,
        }
    }

    /// The Solidity type name of this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::UInt256 => "uint256",
            Self::Int256 => "int256",
            Self::UInt160 => "uint160",
            Self::UInt128 => "uint128",
            Self::Address => "address",
            Self::Int24 => "int24",
            Self::Bool => "bool",
        }
    }

    /// Look up a kind by its Solidity type name.
    ///
    /// `boolean` is accepted as an alias for `bool`. Returns `None` for any
    /// other name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "uint256" => Self::UInt256,
            "int256" => Self::Int256,
            "uint160" => Self::UInt160,
            "uint128" => Self::UInt128,
            "address" => Self::Address,
            "int24" => Self::Int24,
            "bool" | "boolean" => Self::Bool,
            _ => return None,
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A decoded field, tagged with the kind it was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    UInt256(U256),
    Int256(I256),
    /// Zero-extended to 256 bits.
    UInt160(U256),
    UInt128(u128),
    Address(Address),
    Int24(i32),
    Bool(bool),
}

impl Value {
    /// The kind this value was decoded as.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::UInt256(_) => FieldKind::UInt256,
            Self::Int256(_) => FieldKind::Int256,
            Self::UInt160(_) => FieldKind::UInt160,
            Self::UInt128(_) => FieldKind::UInt128,
            Self::Address(_) => FieldKind::Address,
            Self::Int24(_) => FieldKind::Int24,
            Self::Bool(_) => FieldKind::Bool,
        }
    }
}

/// Renders the value as a single row token: decimal digits for integers,
/// `0x`-prefixed hex for addresses, and `true` or `false` for booleans.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UInt256(v) | Self::UInt160(v) => fmt::Display::fmt(v, f),
            Self::Int256(v) => fmt::Display::fmt(v, f),
            Self::UInt128(v) => fmt::Display::fmt(v, f),
            Self::Address(v) => fmt::Display::fmt(v, f),
            Self::Int24(v) => fmt::Display::fmt(v, f),
            Self::Bool(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// An error decoding a field.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field extends past the end of the buffer.
    #[error("Field of {width} bytes at offset {offset} exceeds the buffer of {len} bytes.")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },
}

/// Decode a field of the given kind from an offset in a buffer.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode_field(
    r: &[u8],
    offset: usize,
    kind: FieldKind,
) -> Result<(Value, usize), FieldError> {
    let value = match kind {
        FieldKind::UInt256 => Value::UInt256(U256::from_be_bytes(take(r, offset)?)),
        FieldKind::Int256 => Value::Int256(I256::from_be_bytes(take(r, offset)?)),
        FieldKind::UInt160 => {
            let word = zero_extend(take::<20>(r, offset)?);
            Value::UInt160(U256::from_be_bytes(word))
        }
        FieldKind::UInt128 => Value::UInt128(u128::from_be_bytes(take(r, offset)?)),
        FieldKind::Address => Value::Address(Address(take(r, offset)?)),
        FieldKind::Int24 => Value::Int24(int24(take(r, offset)?)),
        FieldKind::Bool => Value::Bool(take::<1>(r, offset)? == [1]),
    };

    Ok((value, kind.width()))
}

/// Sign-extend a big-endian 24-bit two's-complement integer.
fn int24(r: [u8; 3]) -> i32 {
    bitfield! {
        struct Int24(u32) {
            [0..24] bits: u32,
            [23] is_negative,
        }
    }

    let word = Int24(u32::from_be_bytes([0, r[0], r[1], r[2]]));

    if word.is_negative() {
        (word.bits() | 0xFF00_0000) as i32
    } else {
        word.bits() as i32
    }
}

/// Left-pad a big-endian integer to a full word.
fn zero_extend<const N: usize>(r: [u8; N]) -> [u8; 32] {
    let mut word = [0; 32];
    word[32 - N..].copy_from_slice(&r);
    word
}

/// Take an exact number of bytes from an offset in a slice.
fn take<const N: usize>(r: &[u8], offset: usize) -> Result<[u8; N], FieldError> {
    offset
        .checked_add(N)
        .and_then(|end| r.get(offset..end))
        .and_then(|s| s.try_into().ok())
        .ok_or(FieldError::OutOfBounds {
            offset,
            width: N,
            len: r.len(),
        })
}
