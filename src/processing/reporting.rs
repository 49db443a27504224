// 進捗報告・監視

use async_trait::async_trait;
use mockall::automock;

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// バッチ開始時の報告
    async fn report_started(&self, total_files: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// ディスパッチせずにスキップしたファイルの報告
    async fn report_skipped(&self, file_path: &str, reason: &str);

    /// エラー発生時の報告
    async fn report_error(&self, file_path: &str, error: &str);

    /// バッチ完了時の報告
    async fn report_completed(&self, success_count: usize, error_count: usize);
}

/// コンソール出力による進捗報告実装
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_files: usize) {
        if !self.quiet {
            println!("🚀 {total_files}件のファイル処理を開始します...");
        }
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && (completed % 100 == 0 || completed == total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 進捗: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_skipped(&self, file_path: &str, reason: &str) {
        if !self.quiet {
            println!("⏭️  スキップ: {file_path} ({reason})");
        }
    }

    async fn report_error(&self, file_path: &str, error: &str) {
        if !self.quiet {
            eprintln!("❌ 処理エラー {file_path}: {error}");
        }
    }

    async fn report_completed(&self, success_count: usize, error_count: usize) {
        if !self.quiet {
            println!("✅ 完了! 成功: {success_count}, 失敗: {error_count}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_files: usize) {
        // 何もしない
    }

    async fn report_progress(&self, _completed: usize, _total: usize) {
        // 何もしない
    }

    async fn report_skipped(&self, _file_path: &str, _reason: &str) {
        // 何もしない
    }

    async fn report_error(&self, _file_path: &str, _error: &str) {
        // 何もしない
    }

    async fn report_completed(&self, _success_count: usize, _error_count: usize) {
        // 何もしない
    }
}
