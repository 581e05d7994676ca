//! Engine operations: the per-target pipeline behind each subcommand.
//!
//! Each operation is one pass through export → normalize → store/diff →
//! evaluate for a single target. The multi-target loop in `main` calls
//! these repeatedly; no state is shared between targets, so one target's
//! failure never affects another's processing.

use std::path::Path;

use anyhow::{Context, Result};
use apiguard_diff::{diff, evaluate, CheckMode, Decision};
use apiguard_export::{produce_snapshot, ExporterConfig};
use apiguard_schemas::Snapshot;
use tracing::info;

/// Produces the current snapshot for a target and stores it as the
/// baseline, replacing any prior baseline file.
///
/// Either the baseline is written completely and the write is confirmed,
/// or the operation fails with no partial baseline on disk.
pub fn update_baseline(
    exporter: &ExporterConfig,
    baseline_dir: &Path,
    target: &str,
) -> Result<()> {
    let snapshot = produce_snapshot(exporter, target)
        .with_context(|| format!("failed to snapshot target `{target}`"))?;
    let path = apiguard_store::save(&snapshot, baseline_dir).with_context(
        || format!("failed to store baseline for target `{target}`"),
    )?;
    info!(
        target = %target,
        path = %path.display(),
        symbols = snapshot.symbols.len(),
        "baseline updated"
    );
    Ok(())
}

/// Produces the current snapshot for a target, diffs it against the stored
/// baseline, and evaluates the configured policy.
///
/// The baseline is only read, never written; a failing decision is a
/// reported outcome, not an error. Checking a target that has no baseline
/// is an error (the baseline store's missing-baseline kind, which tells
/// the user to run update first), never an empty-surface comparison.
pub fn check_target(
    exporter: &ExporterConfig,
    baseline_dir: &Path,
    target: &str,
    mode: CheckMode,
    fail_on_additions: bool,
) -> Result<Decision> {
    let current = produce_snapshot(exporter, target)
        .with_context(|| format!("failed to snapshot target `{target}`"))?;
    let baseline = apiguard_store::load(baseline_dir, target).with_context(
        || format!("failed to load baseline for target `{target}`"),
    )?;

    let surface_diff = diff(&baseline, &current);
    info!(
        target = %target,
        added = surface_diff.added.len(),
        removed = surface_diff.removed.len(),
        changed = surface_diff.changed.len(),
        mode = %mode,
        "surface compared"
    );
    Ok(evaluate(&surface_diff, mode, fail_on_additions))
}

/// Produces the current snapshot for a target without touching the store.
pub fn current_snapshot(
    exporter: &ExporterConfig,
    target: &str,
) -> Result<Snapshot> {
    produce_snapshot(exporter, target)
        .with_context(|| format!("failed to snapshot target `{target}`"))
}
