// 並列ファイル処理専用のカスタムエラー型定義

use std::path::Path;
use thiserror::Error;

/// ファイル処理固有のエラー型
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("ファイルオープンエラー: {path} - {source}")]
    OpenError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("読み込みエラー: {path} - {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("書き込みエラー: {path} - {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("行変換エラー: {path} - {source}")]
    TransformError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("ファイル発見エラー: {path} - {source}")]
    FileDiscoveryError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("並列処理エラー: {message}")]
    ParallelExecutionError { message: String },

    #[error("永続化エラー: {source}")]
    PersistenceError {
        #[source]
        source: anyhow::Error,
    },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ProcessingError {
    /// ファイルオープンエラーの作成
    pub fn open(path: &Path, source: std::io::Error) -> Self {
        Self::OpenError {
            path: path.display().to_string(),
            source,
        }
    }

    /// 読み込みエラーの作成
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.display().to_string(),
            source,
        }
    }

    /// 書き込みエラーの作成
    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.display().to_string(),
            source,
        }
    }

    /// 行変換エラーの作成
    pub fn transform(path: &Path, source: anyhow::Error) -> Self {
        Self::TransformError {
            path: path.display().to_string(),
            source,
        }
    }

    /// ファイル発見エラーの作成
    pub fn file_discovery(path: &Path, source: anyhow::Error) -> Self {
        Self::FileDiscoveryError {
            path: path.display().to_string(),
            source,
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 並列実行エラーの作成
    pub fn parallel_execution(message: impl Into<String>) -> Self {
        Self::ParallelExecutionError {
            message: message.into(),
        }
    }

    /// 永続化エラーの作成
    pub fn persistence(source: anyhow::Error) -> Self {
        Self::PersistenceError { source }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// 単一ファイルに閉じたエラーかどうかを判定
    ///
    /// ファイルに閉じたエラーはそのファイルの失敗として記録され、
    /// バッチ全体には伝播しない。
    pub fn is_file_scoped(&self) -> bool {
        match self {
            Self::OpenError { .. }
            | Self::ReadError { .. }
            | Self::WriteError { .. }
            | Self::TransformError { .. }
            | Self::TaskError { .. } => true,
            Self::FileDiscoveryError { .. }
            | Self::ConfigurationError { .. }
            | Self::ParallelExecutionError { .. }
            | Self::PersistenceError { .. } => false,
        }
    }
}

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(error: tokio::task::JoinError) -> Self {
        ProcessingError::TaskError { source: error }
    }
}

/// ファイル処理の結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;
