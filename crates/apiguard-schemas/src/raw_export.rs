//! Raw symbol export schema as produced by the host toolchain.
//!
//! The export is a semi-structured document, one per target, listing every
//! symbol in the module whether externally visible or not. Field names are
//! camelCase on the wire (the toolchain's convention). The normalizer in
//! `apiguard-export` consumes this and keeps only the externally visible
//! surface.
//!
//! Declaration fragments are modeled as flat `{kind, spelling}` records
//! rather than mirroring the toolchain's internal type hierarchy: signature
//! derivation only ever needs the concatenated spellings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One fragment of a symbol's declaration text.
///
/// The toolchain splits a declaration like `func foo(x: Int)` into tagged
/// fragments (keyword, identifier, punctuation, type references). Only the
/// `spelling` contributes to the normalized signature; `kind` is carried for
/// diagnostics.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub struct DeclarationFragment {
    /// Fragment kind tag, e.g. `"keyword"`, `"identifier"`, `"typeIdentifier"`.
    pub kind: String,

    /// The literal text this fragment contributes to the declaration.
    pub spelling: String,
}

/// A single symbol record in the raw export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawSymbol {
    /// Precise, stable identifier for the symbol, unique within one export.
    ///
    /// Opaque to apiguard; used only as the mapping key when diffing.
    pub identifier: String,

    /// Human-readable display name.
    pub name: String,

    /// Kind identifier, e.g. `"func"`, `"struct"`, `"class.method"`.
    pub kind: String,

    /// Human-readable kind, e.g. `"Instance Method"`. Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_kind: Option<String>,

    /// Access level as reported by the toolchain.
    ///
    /// Absent means the symbol is not externally visible. Only `"public"`
    /// and `"open"` count as part of the API surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,

    /// Ordered declaration fragments. Omitted when the toolchain produced
    /// none; the normalizer then falls back to a kind+name signature.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declaration_fragments: Vec<DeclarationFragment>,
}

impl RawSymbol {
    /// Returns true if this symbol belongs to the externally visible surface.
    ///
    /// Exactly two access levels qualify: `public` and `open`. A missing
    /// access level is implementation detail, not an error.
    pub fn is_externally_visible(&self) -> bool {
        matches!(self.access_level.as_deref(), Some("public" | "open"))
    }
}

/// The raw export document for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawExport {
    /// Module name as reported by the toolchain. Informational; the target
    /// name apiguard tracks comes from the invocation, not the export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Every symbol in the module, externally visible or not.
    pub symbols: Vec<RawSymbol>,
}
