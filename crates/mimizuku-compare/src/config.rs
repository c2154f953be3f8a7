use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_REFINEMENT_ROUNDS: usize = 32;
pub const DEFAULT_SEARCH_BUDGET: u64 = 100_000;

/// Limits for canonicalization and the bijection search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorConfig {
    /// Upper bound on signature refinement rounds
    pub max_refinement_rounds: usize,
    /// Candidate assignments the search may try before giving up
    pub search_budget: u64,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            max_refinement_rounds: DEFAULT_MAX_REFINEMENT_ROUNDS,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }
}
