//! # Mimizuku Reasoning
//!
//! 外部推論エンジンによる整合性チェックのゲートウェイ
//! - オントロジーの排他的ロック (RAII コンテキスト)
//! - 推論エンジンの能力トレイトと外部コマンドアダプタ
//! - 失敗・panic を含むあらゆる結果を `ReasoningResult` に変換
//! - ファイルからのオントロジー読み込み

pub mod command;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod ontology;
pub mod result;

pub use command::CommandReasoner;
pub use engine::{ReasoningEngine, ReasoningOptions};
pub use error::{OntologyError, ReasonerError};
pub use gateway::ReasoningGateway;
pub use loader::{FileOntologyLoader, OntologyLoader};
pub use ontology::{Ontology, OntologyContext};
pub use result::{ReasoningResult, ReasoningStatus};
