//! Shared proptest strategies for schema tests.

use proptest::prelude::*;

/// Strategy for generating arbitrary precise-identifier strings.
pub fn arb_identifier() -> impl Strategy<Value = String> {
    "s:[A-Za-z0-9]{1,16}"
}

/// Strategy for generating arbitrary normalized signature strings.
///
/// Signatures are whitespace-collapsed, so generated values contain single
/// spaces only.
pub fn arb_signature() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-zA-Z():,]{1,8}", 1..5)
        .prop_map(|words| words.join(" "))
}
