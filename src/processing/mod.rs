// 並列ファイル処理システムのモジュール
// 機能別ファイル構成によるアーキテクチャ

// コアモジュール
pub mod error; // エラー型定義
pub mod types; // データ構造定義

// 機能モジュール
pub mod config; // 設定管理
pub mod governor; // 同時実行数の流入制御
pub mod persistence; // 結果の永続化
pub mod pipeline; // 単一ファイルのパイプライン
pub mod processor; // バッチのオーケストレーション
pub mod reporting; // 進捗報告・監視
pub mod tracker; // ファイル状態追跡

// 公開API - 各機能から再エクスポート
pub use config::{DefaultProcessorConfig, ProcessorConfig};
pub use error::{ProcessingError, ProcessingResult};
pub use governor::{ConcurrencyGovernor, GovernorPermit};
pub use persistence::{MemoryOutcomePersistence, OutcomePersistence, StreamingJsonPersistence};
pub use pipeline::output_path_for;
pub use processor::BatchProcessor;
pub use reporting::{ConsoleProgressReporter, NoOpProgressReporter, ProgressReporter};
pub use tracker::{AdmissionDecision, FileState, FileStateTracker};
pub use types::{BatchResult, BatchSummary, FileOutcome};
