//! # Mimizuku - ナレッジグラフ成果物の検証スタック
//!
//! オントロジーと RDF グラフを複数の形式で読み込み、形式間の変換、
//! 空白ノードを考慮したグラフ比較、来歴 (PROV) メタデータの確認、
//! 外部推論エンジンによる整合性チェックを行う。
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mimizuku::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let validator = Validator::new();
//!     let graph = validator.load_graph("document.jsonld", "json-ld")?;
//!     println!("provenance: {}", validator.has_provenance(&graph));
//!     println!("{}", validator.serialize(&graph, "turtle")?);
//!     Ok(())
//! }
//! ```
//!
//! ## クレート構成
//!
//! - **`mimizuku-core`**: IRI / 空白ノード / リテラル / トリプル / グラフ
//! - **`mimizuku-formats`**: Turtle, N-Triples, N3, JSON-LD, RDF/XML, TriG
//! - **`mimizuku-compare`**: グラフ同型判定と差分
//! - **`mimizuku-provenance`**: PROV 語彙の検出
//! - **`mimizuku-reasoning`**: 推論ゲートウェイ
//!
//! ## Feature Flags
//!
//! - `full` (default): 全コンポーネント
//! - `compare` / `provenance` / `reasoning`: 個別に有効化
//!
//! `Validator` と `MimizukuError` は `full` 構成でのみ使える。

pub mod config;
pub mod logging;

#[cfg(all(
    feature = "mimizuku-compare",
    feature = "mimizuku-provenance",
    feature = "mimizuku-reasoning"
))]
pub mod error;
#[cfg(all(
    feature = "mimizuku-compare",
    feature = "mimizuku-provenance",
    feature = "mimizuku-reasoning"
))]
pub mod validator;

pub use mimizuku_core as core;
pub use mimizuku_formats as formats;

#[cfg(feature = "mimizuku-compare")]
pub use mimizuku_compare as compare;

#[cfg(feature = "mimizuku-provenance")]
pub use mimizuku_provenance as provenance;

#[cfg(feature = "mimizuku-reasoning")]
pub use mimizuku_reasoning as reasoning;

pub use config::{ConfigError, MimizukuConfig};

#[cfg(all(
    feature = "mimizuku-compare",
    feature = "mimizuku-provenance",
    feature = "mimizuku-reasoning"
))]
pub use error::{MimizukuError, Result};
#[cfg(all(
    feature = "mimizuku-compare",
    feature = "mimizuku-provenance",
    feature = "mimizuku-reasoning"
))]
pub use validator::Validator;

pub use anyhow;
pub use serde;
pub use serde_json;

/// Current version of Mimizuku
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ```rust
/// use mimizuku::prelude::*;
/// ```
pub mod prelude {
    pub use mimizuku_core::{BlankNode, Graph, Iri, Literal, Subject, Term, Triple};
    pub use mimizuku_formats::{FormatCodec, FormatError, RdfFormat};

    pub use crate::config::MimizukuConfig;

    #[cfg(feature = "mimizuku-compare")]
    pub use mimizuku_compare::{CompareError, GraphDiff};

    #[cfg(feature = "mimizuku-provenance")]
    pub use mimizuku_provenance::{has_provenance, ProvenanceReport};

    #[cfg(feature = "mimizuku-reasoning")]
    pub use mimizuku_reasoning::{
        Ontology, ReasoningEngine, ReasoningOptions, ReasoningResult, ReasoningStatus,
    };

    #[cfg(all(
        feature = "mimizuku-compare",
        feature = "mimizuku-provenance",
        feature = "mimizuku-reasoning"
    ))]
    pub use crate::{MimizukuError, Validator};

    pub use anyhow::Result;
}
