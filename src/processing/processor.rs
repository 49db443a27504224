// バッチ処理のオーケストレーション
//
// 全ての依存関係はコンストラクタで注入される。エンジン自体を
// 共有したい場合は Arc<BatchProcessor> でラップする。

use super::config::ProcessorConfig;
use super::error::{ProcessingError, ProcessingResult};
use super::governor::ConcurrencyGovernor;
use super::persistence::OutcomePersistence;
use super::pipeline::process_single_file;
use super::reporting::ProgressReporter;
use super::tracker::{AdmissionDecision, FileStateTracker};
use super::types::{BatchResult, BatchSummary, FileOutcome};
use crate::file_scanner::FileScanner;
use crate::transform::LineTransform;
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// ファイルバッチを並列処理するエンジン
pub struct BatchProcessor<T, C, R, P> {
    transform: Arc<T>,
    config: C,
    reporter: Arc<R>,
    persistence: Arc<P>,
    governor: Arc<ConcurrencyGovernor>,
    tracker: Arc<FileStateTracker>,
}

impl<T, C, R, P> BatchProcessor<T, C, R, P>
where
    T: LineTransform + 'static,
    C: ProcessorConfig,
    R: ProgressReporter + 'static,
    P: OutcomePersistence + 'static,
{
    /// 新しい処理エンジンを作成する
    ///
    /// 設定の検証と出力ディレクトリの用意はここで済ませる。
    /// 不正な設定は ConfigurationError となり、ファイルのディスパッチ
    /// 開始後にはエラーを持ち込まない。
    pub fn new(transform: T, config: C, reporter: R, persistence: P) -> ProcessingResult<Self> {
        config.validate()?;
        let governor = ConcurrencyGovernor::new(config.max_concurrency())?;

        std::fs::create_dir_all(config.output_dir()).map_err(|e| {
            ProcessingError::configuration(format!(
                "出力ディレクトリを作成できません: {} - {e}",
                config.output_dir().display()
            ))
        })?;

        Ok(Self {
            transform: Arc::new(transform),
            config,
            reporter: Arc::new(reporter),
            persistence: Arc::new(persistence),
            governor: Arc::new(governor),
            tracker: Arc::new(FileStateTracker::new()),
        })
    }

    /// 入力ディレクトリ直下の全ファイルを処理する
    pub async fn process_directory(&self) -> ProcessingResult<BatchResult> {
        let input_dir = self.config.input_dir();
        let files = FileScanner::scan_directory(input_dir)
            .map_err(|e| ProcessingError::file_discovery(input_dir, e))?;

        self.process_files(files).await
    }

    /// ファイルリストを処理し、パスごとの成否を返す
    ///
    /// 結果には提出された一意なパスごとにちょうど1エントリが入る。
    /// 重複の排除はトラッカーの判定に委ねる: 同一呼び出し内の2回目
    /// 以降の出現と、処理済み・処理中のパスはディスパッチされず、
    /// スキップとして記録される。重複パスの成否は最初にディスパッチ
    /// されたパイプラインの結果に解決される。
    /// 単一ファイルの失敗がバッチ全体を中断することはない。
    pub async fn process_files(&self, files: Vec<PathBuf>) -> ProcessingResult<BatchResult> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        self.reporter.report_started(files.len()).await;

        let mut results: HashMap<PathBuf, bool> = HashMap::new();
        let mut skipped_count = 0usize;
        let mut handles = Vec::new();

        for file in files {
            match self.tracker.try_begin(&file) {
                AdmissionDecision::Proceed => {
                    let task = tokio::spawn(process_single_file(
                        file.clone(),
                        self.config.output_dir().to_path_buf(),
                        self.transform.clone(),
                        self.governor.clone(),
                        self.tracker.clone(),
                        self.reporter.clone(),
                    ));
                    handles.push((file, task));
                }
                AdmissionDecision::SkipInProgress => {
                    skipped_count += 1;
                    self.reporter
                        .report_skipped(&file.display().to_string(), "処理中のためスキップ")
                        .await;
                    // 同一呼び出し内の重複であれば、後段でパイプラインの
                    // 結果に上書きされる。別の呼び出しが処理中の場合は
                    // この呼び出しでは成功を確認できないため false のまま
                    results.entry(file).or_insert(false);
                }
                AdmissionDecision::SkipFinished { success } => {
                    skipped_count += 1;
                    self.reporter
                        .report_skipped(&file.display().to_string(), "処理済みのためスキップ")
                        .await;
                    results.entry(file).or_insert(success);
                }
            }
        }

        let dispatched = handles.len();
        let mut completed = 0usize;

        for (file, task) in handles {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    // パイプラインの予期しない失敗はこの境界で失敗結果に写像する
                    self.tracker.complete(&file, false);
                    let error = ProcessingError::task(join_error);
                    self.reporter
                        .report_error(&file.display().to_string(), &error.to_string())
                        .await;
                    FileOutcome {
                        file_path: file,
                        success: false,
                        error: Some(error.to_string()),
                    }
                }
            };

            completed += 1;
            self.persistence
                .store_outcome(&outcome)
                .await
                .map_err(ProcessingError::persistence)?;
            self.reporter.report_progress(completed, dispatched).await;
            results.insert(outcome.file_path, outcome.success);
        }

        let success_count = results.values().filter(|success| **success).count();
        let error_count = results.len() - success_count;
        let summary = BatchSummary {
            total_files: results.len(),
            success_count,
            error_count,
            skipped_count,
            total_processing_time_ms: start_time.elapsed().as_millis() as u64,
            started_at,
        };

        self.persistence
            .finalize(&summary)
            .await
            .map_err(ProcessingError::persistence)?;
        self.reporter
            .report_completed(success_count, error_count)
            .await;

        Ok(BatchResult { results, summary })
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.config
    }

    /// 状態トラッカーへの参照を取得
    pub fn tracker(&self) -> &FileStateTracker {
        &self.tracker
    }
}
