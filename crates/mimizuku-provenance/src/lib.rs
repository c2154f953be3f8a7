//! # Mimizuku Provenance
//!
//! W3C PROV の最小限のメタデータ検出
//! - prov: 語彙 8 語のいずれかが任意の位置に現れれば「来歴あり」
//! - 検出した語彙と一致トリプル数のレポート

pub mod matcher;
pub mod term;

pub use matcher::{has_provenance, has_provenance_in, ProvenanceMatcher, ProvenanceReport};
pub use term::ProvenanceTerm;
