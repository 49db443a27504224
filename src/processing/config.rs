// バッチ処理の設定管理

use super::error::{ProcessingError, ProcessingResult};
use std::path::{Path, PathBuf};

/// バッチ処理の設定を抽象化するトレイト
pub trait ProcessorConfig: Send + Sync {
    /// 入力ディレクトリを取得
    fn input_dir(&self) -> &Path;

    /// 出力ディレクトリを取得
    fn output_dir(&self) -> &Path;

    /// 最大同時実行ファイル数を取得
    fn max_concurrency(&self) -> usize;

    /// 設定値の検証
    ///
    /// 構築時に呼び出す。不正な値は使用時まで持ち越さない。
    fn validate(&self) -> ProcessingResult<()> {
        if self.max_concurrency() == 0 {
            return Err(ProcessingError::configuration(
                "最大同時実行数は1以上である必要があります",
            ));
        }
        Ok(())
    }
}

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProcessorConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    max_concurrency: usize,
}

impl DefaultProcessorConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            max_concurrency: num_cpus::get().max(1) * 2,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

impl ProcessorConfig for DefaultProcessorConfig {
    fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}
