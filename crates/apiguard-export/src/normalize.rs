//! Symbol normalization: raw export to snapshot.
//!
//! Normalization does two things: it drops everything that is not part of
//! the externally visible surface, and it reduces each surviving symbol's
//! declaration to one stable signature string. The signature is sensitive
//! to type and parameter changes but insensitive to incidental formatting,
//! so reformatting a declaration never reads as an API change.

use std::collections::HashMap;

use apiguard_schemas::{RawExport, RawSymbol, Snapshot, SymbolId};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};

/// Builds a snapshot from a raw export, keeping only externally visible
/// symbols.
///
/// Pure apart from one wall-clock read for the snapshot timestamp. A
/// duplicate identifier within one export is a data-quality signal, not an
/// error: the later record overwrites the earlier one and the collision is
/// logged.
pub fn normalize(raw: &RawExport, target: &str) -> Snapshot {
    let mut symbols: HashMap<SymbolId, String> =
        HashMap::with_capacity(raw.symbols.len());

    for record in &raw.symbols {
        if !record.is_externally_visible() {
            continue;
        }
        let id = SymbolId::new(record.identifier.as_str());
        if let Some(previous) = symbols.insert(id, signature_of(record)) {
            warn!(
                target = %target,
                identifier = %record.identifier,
                previous = %previous,
                "duplicate symbol identifier in export; keeping later record"
            );
        }
    }

    debug!(
        target = %target,
        total = raw.symbols.len(),
        visible = symbols.len(),
        "normalize.complete"
    );

    Snapshot {
        target: target.to_owned(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        symbols,
    }
}

/// Derives the normalized signature for one symbol record.
///
/// With declaration fragments: concatenate the spellings in order, collapse
/// whitespace runs to a single space, trim. Without fragments: fall back to
/// `"{kind} {name}"`, coarser but still deterministic.
fn signature_of(record: &RawSymbol) -> String {
    if record.declaration_fragments.is_empty() {
        return format!("{} {}", record.kind, record.name);
    }
    let joined: String = record
        .declaration_fragments
        .iter()
        .map(|fragment| fragment.spelling.as_str())
        .collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
