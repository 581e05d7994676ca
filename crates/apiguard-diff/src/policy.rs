//! Change-policy evaluation: deciding whether a diff is breaking.
//!
//! Removals and signature changes are always breaking, regardless of mode.
//! Additions depend on policy: under semantic versioning they are
//! non-breaking unless the caller opted to forbid them; under strict mode
//! any change to a frozen surface counts, additions included, because even
//! an addition is an uncommunicated change there.

use std::fmt::Write;

use crate::SurfaceDiff;

/// Comparison mode for the policy evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Additive changes pass unless additions are explicitly forbidden.
    Semver,
    /// Any non-empty diff fails.
    Strict,
}

impl std::fmt::Display for CheckMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMode::Semver => f.write_str("semver"),
            CheckMode::Strict => f.write_str("strict"),
        }
    }
}

/// Pass/fail outcome for one target, with a report that is rendered
/// whether or not the check passed, so passing runs stay auditable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// True if the diff is acceptable under the evaluated policy.
    pub passed: bool,
    /// Human-readable report: per-category counts, plus the affected
    /// identifiers for removals and signature changes.
    pub report: String,
}

/// Evaluates a diff against a mode and an additions policy.
///
/// Pure function of its three inputs; a failing decision is the expected
/// negative outcome, not an error.
pub fn evaluate(
    diff: &SurfaceDiff,
    mode: CheckMode,
    fail_on_additions: bool,
) -> Decision {
    let passed = match mode {
        CheckMode::Strict => diff.is_empty(),
        CheckMode::Semver => {
            diff.removed.is_empty()
                && diff.changed.is_empty()
                && (!fail_on_additions || diff.added.is_empty())
        }
    };

    Decision {
        passed,
        report: render_report(diff),
    }
}

/// Renders the report body: one counts line, then the removed and changed
/// identifiers. Added symbols are counted but not listed; they carry no
/// baseline signature to explain.
fn render_report(diff: &SurfaceDiff) -> String {
    let mut report = format!(
        "added {}, removed {}, changed {}",
        diff.added.len(),
        diff.removed.len(),
        diff.changed.len(),
    );
    for id in &diff.removed {
        write!(report, "\n  removed: {id}").expect("writing to String");
    }
    for id in &diff.changed {
        write!(report, "\n  changed: {id}").expect("writing to String");
    }
    report
}
