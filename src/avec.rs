//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module are suited to decoding whole records from
//! slices and hex strings, either publishing to the [`FromRecord`] trait or
//! collecting [`Value`](crate::sans::Value)s, and to keeping the dataset logs
//! those records are written to.
//!
//! When a record is of a known shape, [`FromRecord`] can be derived. See the
//! [`FromRecord`](macro@FromRecord) macro for details.

#[cfg(feature = "std")]
pub mod log;
pub mod slice;
#[cfg(feature = "std")]
pub mod text;

pub use slice::decode as decode_slice;
#[cfg(feature = "std")]
pub use text::{decode_record, render_row};

use crate::sans::word::{Address, I256, U256};

/// Derive [`FromRecord`] for a struct representing a single record.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a value, add the `field(N)` attribute to an `Option<T>` struct
/// field, where `N` is the position of the field in the schema and `T` is the
/// type the field decodes to: [`U256`] for `uint256` and `uint160`, [`I256`]
/// for `int256`, `u128` for `uint128`, [`Address`] for `address`, `i32` for
/// `int24`, and `bool` for `bool`.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct Rebalance {
///     #[field(0)]
///     tick: Option<i32>,
///     #[field(1)]
///     block_number: Option<U256>,
/// }
/// ```
///
/// To convert while receiving, supply an accumulator closure. Since the value
/// type cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct Swap {
///     #[field(1, |d, v: bool| *d = if v { Direction::ZeroForOne } else { Direction::OneForZero })]
///     direction: Direction,
/// }
/// ```
#[cfg(feature = "derive")]
pub use packlog_derive::FromRecord;

/// Receive field values for a record.
///
/// Values are published in schema order, each with its position in the
/// schema. The default implementation of each method ignores received values.
///
/// See the [`FromRecord`](macro@FromRecord) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromRecord {
    /// Add a `uint256` or `uint160` value for a field to the record.
    fn add_u256(&mut self, field: usize, _: U256) {}
    /// Add an `int256` value for a field to the record.
    fn add_i256(&mut self, field: usize, _: I256) {}
    /// Add a `uint128` value for a field to the record.
    fn add_u128(&mut self, field: usize, _: u128) {}
    /// Add an `address` value for a field to the record.
    fn add_address(&mut self, field: usize, _: Address) {}
    /// Add an `int24` value for a field to the record.
    fn add_i32(&mut self, field: usize, _: i32) {}
    /// Add a `bool` value for a field to the record.
    fn add_bool(&mut self, field: usize, _: bool) {}
}
