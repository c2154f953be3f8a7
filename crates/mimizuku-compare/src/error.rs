use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// The bijection search ran out of steps before reaching a decision
    #[error("Comparison exceeded its search budget of {budget} steps ({blank_nodes} blank nodes)")]
    ComparisonTimeout { budget: u64, blank_nodes: usize },
}

pub type Result<T> = std::result::Result<T, CompareError>;
