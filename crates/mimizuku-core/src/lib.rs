//! # Mimizuku Core
//!
//! フォーマット非依存の RDF データモデル
//! - IRI / 空白ノード / リテラル
//! - トリプルとグラフ (トリプル集合 + 名前空間プレフィックス)
//! - 語彙定数 (rdf, rdfs, xsd, owl, prov)

pub mod model;
pub mod graph;
pub mod vocab;

pub use model::*;
pub use graph::*;
