//! Surface diffing and change-policy evaluation.
//!
//! Both halves of this crate are pure: [`diff`] turns two snapshots of one
//! target into sorted identifier sets, and [`evaluate`] folds a diff and a
//! policy into a pass/fail [`Decision`]. Neither touches the filesystem or
//! keeps state, so the multi-target loop in the binary is just repeated
//! invocations with no shared mutable state.

mod policy;

use apiguard_schemas::{Snapshot, SymbolId};

#[doc(inline)]
pub use crate::policy::{evaluate, CheckMode, Decision};

/// The structured difference between two snapshots of one target.
///
/// All three sequences are sorted lexicographically by identifier so
/// reports are stable and reviewable across runs and machines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceDiff {
    /// Identifiers present in the new snapshot but not the baseline.
    pub added: Vec<SymbolId>,
    /// Identifiers present in the baseline but not the new snapshot.
    pub removed: Vec<SymbolId>,
    /// Identifiers present in both whose signatures differ byte-for-byte.
    pub changed: Vec<SymbolId>,
}

impl SurfaceDiff {
    /// Returns true if the two snapshots describe an identical surface.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
    }
}

/// Computes the added, removed, and changed identifier sets between a
/// baseline snapshot and a newer one.
///
/// Signatures are compared byte-for-byte; they were normalized when the
/// snapshots were built. Both snapshots must describe the same target.
/// That is the caller's contract, not checked here; mismatched targets
/// produce a nonsensical diff. Runs in linear time over the combined
/// symbol count and requires no ordering from the inputs.
pub fn diff(old: &Snapshot, new: &Snapshot) -> SurfaceDiff {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut changed = Vec::new();

    for (id, signature) in &new.symbols {
        match old.symbols.get(id) {
            None => added.push(id.clone()),
            Some(old_signature) if old_signature != signature => {
                changed.push(id.clone());
            }
            Some(_) => {}
        }
    }
    for id in old.symbols.keys() {
        if !new.symbols.contains_key(id) {
            removed.push(id.clone());
        }
    }

    added.sort_unstable();
    removed.sort_unstable();
    changed.sort_unstable();

    SurfaceDiff {
        added,
        removed,
        changed,
    }
}
