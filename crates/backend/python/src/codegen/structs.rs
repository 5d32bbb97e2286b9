//! Struct normalization tracking.

use std::collections::HashSet;

/// Base variables already normalized into struct-capable form.
///
/// One set lives for exactly one top-level declaration. The first field
/// store into a base emits a `check_struct` call; later stores skip it.
#[derive(Debug, Default)]
pub(crate) struct StructSet {
    seen: HashSet<String>,
}

impl StructSet {
    /// Records `base`, returning true the first time it is seen.
    pub(crate) fn insert(&mut self, base: &str) -> bool {
        if self.seen.contains(base) {
            return false;
        }
        self.seen.insert(base.to_owned())
    }
}
