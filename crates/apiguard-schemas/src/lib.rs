//! Schema definitions for apiguard's wire and on-disk formats.
//!
//! This crate contains the data structures that cross apiguard's process and
//! filesystem boundaries: the raw symbol export consumed from the host
//! toolchain, the normalized snapshot persisted as a baseline, and the
//! canonical JSON encoder that makes baseline files byte-stable.
//!
//! The schemas are designed to be:
//! - **Tolerant**: the raw export is toolchain-specific and may grow fields;
//!   unknown fields are ignored on deserialization
//! - **Self-describing**: JSON Schema is auto-generated from Rust types
//! - **Deterministic**: persisted snapshots are encoded canonically, so two
//!   logically equal snapshots always produce identical bytes

mod canonical;
mod raw_export;
mod snapshot;
#[cfg(test)]
mod testutil;

#[doc(inline)]
pub use canonical::*;
#[doc(inline)]
pub use raw_export::*;
#[doc(inline)]
pub use snapshot::*;
