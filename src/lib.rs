#![no_std]

//! A schema-driven decoder for the packed big-endian records emitted by
//! contract test harnesses.
//!
//! Test contracts pack swaps, deposits, withdrawals, pool state and similar
//! events into fixed-layout byte strings. Packlog walks such a record against
//! an ordered list of field kinds, extracts each value with the right width
//! and signedness (including 24- and 256-bit two's complement), and renders
//! the result as a row of a per-dataset log.
//!
//! Most users should begin with the functions in the [`avec`] module and the
//! layouts in [`schema`]. Applications without an allocator can drive the
//! decoder described in the [`sans`] module directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable hex input, row rendering and dataset logs (default).
//! - `cli`: build the `packlog` command-line tool.

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod avec;
pub mod sans;
pub mod schema;
