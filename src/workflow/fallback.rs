use crate::workflow::types::{ReferenceEntry, ReferenceSet};

/// Default branches offered when the reference store has no active entries
pub const FALLBACK_BRANCHES: [(&str, &str); 3] = [
    ("1", "Main Branch"),
    ("2", "North Branch"),
    ("3", "South Branch"),
];

/// Supplies the fixed default reference set. Only used for a successful but
/// empty reference fetch, never for a failed one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceFallbackResolver;

impl ReferenceFallbackResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self) -> ReferenceSet {
        ReferenceSet::new(
            FALLBACK_BRANCHES
                .iter()
                .map(|(id, name)| ReferenceEntry::new(id, name))
                .collect(),
        )
    }

    /// Human-readable list of the defaults, used in the warning detail
    pub fn describe(&self) -> String {
        FALLBACK_BRANCHES
            .iter()
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
