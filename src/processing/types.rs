// 並列ファイル処理のデータ構造定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 単一ファイルの終端結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// 入力ファイルのパス
    pub file_path: PathBuf,
    /// 処理が成功したかどうか
    pub success: bool,
    /// 失敗時のエラーメッセージ
    pub error: Option<String>,
}

/// バッチ全体の集計情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// 結果に含まれる一意なファイル数
    pub total_files: usize,
    /// 成功したファイル数
    pub success_count: usize,
    /// 失敗したファイル数
    pub error_count: usize,
    /// 実行せずにスキップしたファイル数（重複・処理済み）
    pub skipped_count: usize,
    /// 総処理時間（ミリ秒）
    pub total_processing_time_ms: u64,
    /// バッチ開始時刻
    pub started_at: DateTime<Utc>,
}

/// バッチ処理の結果
///
/// `results` は提出された一意なパスごとに1エントリを持つ。
/// 完了順序は保証されない（内容のみが意味を持つ）。
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub results: HashMap<PathBuf, bool>,
    pub summary: BatchSummary,
}

impl BatchResult {
    /// 指定パスの成否を取得
    pub fn is_success(&self, path: &Path) -> Option<bool> {
        self.results.get(path).copied()
    }

    pub fn success_count(&self) -> usize {
        self.results.values().filter(|success| **success).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.len() - self.success_count()
    }
}
