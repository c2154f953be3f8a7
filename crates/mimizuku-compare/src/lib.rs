//! # Mimizuku Compare
//!
//! 空白ノードの付け替えを考慮したグラフ同型判定
//! - 近傍シグネチャの反復精密化による正準ラベル
//! - ステップ数で打ち切る全単射探索
//! - トリプル単位の差分 (A のみ / B のみ / 共通)

pub mod comparator;
pub mod config;
pub mod diff;
pub mod error;

mod canon;
mod search;

pub use comparator::GraphComparator;
pub use config::ComparatorConfig;
pub use diff::GraphDiff;
pub use error::{CompareError, Result};

use mimizuku_core::Graph;

/// Isomorphism check with the default limits
pub fn isomorphic(a: &Graph, b: &Graph) -> Result<bool> {
    GraphComparator::default().is_isomorphic(a, b)
}

pub fn diff(a: &Graph, b: &Graph) -> Result<GraphDiff> {
    GraphComparator::default().diff(a, b)
}
