// エラー処理の統合テスト
use anyhow::anyhow;
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use text_transform::{
    BatchProcessor, DefaultProcessorConfig, FileState, FixtureGenerator, LineTransform,
    MemoryOutcomePersistence, NoOpProgressReporter, ProcessingError, UppercaseTransform,
};

/// 指定回数の変換後に失敗する変換（障害注入用）
struct FailAfterTransform {
    limit: usize,
    seen: AtomicUsize,
}

impl FailAfterTransform {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LineTransform for FailAfterTransform {
    async fn transform_line(&self, line: &str) -> anyhow::Result<String> {
        let index = self.seen.fetch_add(1, Ordering::SeqCst);
        if index >= self.limit {
            return Err(anyhow!("注入された変換エラー"));
        }
        Ok(line.to_uppercase())
    }
}

fn make_config(input_dir: &Path, output_dir: &Path, concurrency: usize) -> DefaultProcessorConfig {
    DefaultProcessorConfig::new(input_dir, output_dir).with_max_concurrency(concurrency)
}

#[tokio::test]
async fn test_configuration_error_before_dispatch() {
    let temp_dir = TempDir::new().unwrap();

    let result = BatchProcessor::new(
        UppercaseTransform::new(),
        make_config(
            &temp_dir.path().join("in"),
            &temp_dir.path().join("out"),
            0,
        ),
        NoOpProgressReporter::new(),
        MemoryOutcomePersistence::new(),
    );

    // 不正な同時実行数は構築時に拒否され、ファイル処理は始まらない
    assert!(matches!(
        result,
        Err(ProcessingError::ConfigurationError { .. })
    ));
}

#[tokio::test]
async fn test_uncreatable_output_directory_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let blocking_file = temp_dir.path().join("occupied");
    fs::write(&blocking_file, "not a directory").unwrap();

    // 既存ファイルの下にはディレクトリを作れない
    let result = BatchProcessor::new(
        UppercaseTransform::new(),
        make_config(
            &temp_dir.path().join("in"),
            &blocking_file.join("out"),
            2,
        ),
        NoOpProgressReporter::new(),
        MemoryOutcomePersistence::new(),
    );

    assert!(matches!(
        result,
        Err(ProcessingError::ConfigurationError { .. })
    ));
}

#[tokio::test]
async fn test_durability_bound_on_injected_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("in");
    let output_dir = temp_dir.path().join("out");

    let files = FixtureGenerator::create_test_files(&input_dir, 1, 20).unwrap();

    // 7行書いたところで変換が失敗する
    let persistence = MemoryOutcomePersistence::new();
    let processor = BatchProcessor::new(
        FailAfterTransform::new(7),
        make_config(&input_dir, &output_dir, 1),
        NoOpProgressReporter::new(),
        persistence.clone(),
    )
    .unwrap();

    let result = processor.process_files(files.clone()).await.unwrap();
    assert_eq!(result.is_success(&files[0]), Some(false));

    // フラッシュ済みの7行はちょうどそのまま残り、それ以上でも以下でもない
    let output_path = output_dir.join("processed_test_file_0.txt");
    let content = fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "THIS IS LINE 0 IN FILE 0");
    assert_eq!(lines[6], "THIS IS LINE 6 IN FILE 0");

    // 失敗はレポートにも記録されている
    let outcomes = persistence.stored_outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].success);
    assert!(outcomes[0]
        .error
        .as_deref()
        .unwrap()
        .contains("行変換エラー"));
}

#[tokio::test]
async fn test_one_failure_does_not_abort_batch() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("in");
    let output_dir = temp_dir.path().join("out");

    let mut files = FixtureGenerator::create_test_files(&input_dir, 3, 5).unwrap();
    let missing = input_dir.join("missing.txt");
    files.insert(1, missing.clone());

    let processor = BatchProcessor::new(
        UppercaseTransform::new(),
        make_config(&input_dir, &output_dir, 2),
        NoOpProgressReporter::new(),
        MemoryOutcomePersistence::new(),
    )
    .unwrap();

    let result = processor.process_files(files.clone()).await.unwrap();

    // 存在しないファイルだけが失敗し、残りは完走する
    assert_eq!(result.results.len(), 4);
    assert_eq!(result.is_success(&missing), Some(false));
    assert_eq!(result.success_count(), 3);

    // トラッカー上も該当ファイルのみ Failed
    assert_eq!(processor.tracker().state_of(&missing), Some(FileState::Failed));
    assert_eq!(
        processor.tracker().state_of(&files[0]),
        Some(FileState::Completed)
    );
}

#[tokio::test]
async fn test_failed_file_can_not_be_retried_within_processor() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("in");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();

    let missing = input_dir.join("missing.txt");
    let processor = BatchProcessor::new(
        UppercaseTransform::new(),
        make_config(&input_dir, &output_dir, 1),
        NoOpProgressReporter::new(),
        MemoryOutcomePersistence::new(),
    )
    .unwrap();

    let first = processor.process_files(vec![missing.clone()]).await.unwrap();
    assert_eq!(first.is_success(&missing), Some(false));

    // 同一プロセッサでの再提出は終端状態を引き継いでスキップされる
    let second = processor.process_files(vec![missing.clone()]).await.unwrap();
    assert_eq!(second.is_success(&missing), Some(false));
    assert_eq!(second.summary.skipped_count, 1);
}
