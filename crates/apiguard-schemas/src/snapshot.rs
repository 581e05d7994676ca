//! Normalized API surface snapshot, the unit of baseline comparison.
//!
//! A snapshot maps each externally visible symbol's stable identifier to its
//! normalized signature string. Snapshots are created fresh on every run and
//! either persisted as the target's baseline or discarded after diffing.

use std::borrow::Borrow;
use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable identifier of one symbol, unique within a target's export.
///
/// Opaque: apiguard never interprets the identifier's structure, it only
/// uses it as a mapping key. Serializes transparently as a plain string.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct SymbolId(String);

impl SymbolId {
    /// Creates a symbol identifier from a raw string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SymbolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SymbolId {
    /// Enables `HashMap<SymbolId, _>::get("s:foo")` lookups.
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A normalized, point-in-time record of a target's API surface.
///
/// Contains only symbols whose access level was explicitly `public` or
/// `open`; everything else is implementation detail and never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// The target this snapshot describes.
    pub target: String,

    /// RFC 3339 creation timestamp. Informational only: never consulted by
    /// the diff engine and excluded from idempotency guarantees.
    pub created_at: String,

    /// Mapping of symbol identifier to normalized signature.
    pub symbols: HashMap<SymbolId, String>,
}

impl Snapshot {
    /// Encodes this snapshot as canonical JSON bytes.
    ///
    /// Two snapshots with equal target, timestamp, and symbol pairs encode
    /// to identical bytes regardless of map insertion order, so baseline
    /// files never show spurious churn under version control.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the snapshot cannot be converted
    /// to a JSON value. This is an internal-contract violation and should
    /// not occur for any constructible snapshot.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        Ok(crate::to_canonical_bytes(&value))
    }
}
