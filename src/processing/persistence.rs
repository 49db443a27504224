// 処理結果の永続化

use super::types::{BatchSummary, FileOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use mockall::automock;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex as AsyncMutex;

/// ファイル結果の永続化抽象化トレイト
#[automock]
#[async_trait]
pub trait OutcomePersistence: Send + Sync {
    /// 単一ファイルの結果を保存
    async fn store_outcome(&self, outcome: &FileOutcome) -> Result<()>;

    /// バッチ完了時の確定処理
    ///
    /// これ以降の `store_outcome` 呼び出しは想定しない。
    async fn finalize(&self, summary: &BatchSummary) -> Result<()>;
}

/// メモリ内保存の永続化実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryOutcomePersistence {
    outcomes: Arc<Mutex<Vec<FileOutcome>>>,
    summary: Arc<Mutex<Option<BatchSummary>>>,
}

impl MemoryOutcomePersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用：保存された結果を取得
    pub fn stored_outcomes(&self) -> Vec<FileOutcome> {
        self.outcomes.lock().unwrap().clone()
    }

    /// テスト用：確定済みかどうかを確認
    pub fn is_finalized(&self) -> bool {
        self.summary.lock().unwrap().is_some()
    }

    /// テスト用：確定時の集計を取得
    pub fn finalized_summary(&self) -> Option<BatchSummary> {
        self.summary.lock().unwrap().clone()
    }

    /// テスト用：データクリア
    pub fn clear(&self) {
        self.outcomes.lock().unwrap().clear();
        *self.summary.lock().unwrap() = None;
    }
}

#[async_trait]
impl OutcomePersistence for MemoryOutcomePersistence {
    async fn store_outcome(&self, outcome: &FileOutcome) -> Result<()> {
        self.outcomes.lock().unwrap().push(outcome.clone());
        Ok(())
    }

    async fn finalize(&self, summary: &BatchSummary) -> Result<()> {
        *self.summary.lock().unwrap() = Some(summary.clone());
        Ok(())
    }
}

struct JsonStreamState {
    writer: BufWriter<File>,
    entries_written: usize,
}

/// ストリーミングJSON出力の永続化実装
///
/// 結果を受け取るたびに追記し、`finalize` で集計を書き足して
/// ファイルを完成させる。大きなバッチでも結果をメモリに
/// 溜め込まない。
pub struct StreamingJsonPersistence {
    output_path: PathBuf,
    state: Arc<AsyncMutex<Option<JsonStreamState>>>,
}

impl StreamingJsonPersistence {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            state: Arc::new(AsyncMutex::new(None)),
        }
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    /// 最初の書き込みでファイルを作成し、JSONの冒頭を書き出す
    async fn ensure_initialized<'a>(
        &self,
        state: &'a mut Option<JsonStreamState>,
    ) -> Result<&'a mut JsonStreamState> {
        if state.is_none() {
            if let Some(parent) = self.output_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.with_context(|| {
                        format!("レポート出力先を作成できません: {}", parent.display())
                    })?;
                }
            }

            let file = File::create(&self.output_path).await.with_context(|| {
                format!(
                    "レポートファイルを作成できません: {}",
                    self.output_path.display()
                )
            })?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(b"{\n  \"outcomes\": [")
                .await
                .context("レポートの書き込みに失敗しました")?;

            *state = Some(JsonStreamState {
                writer,
                entries_written: 0,
            });
        }

        Ok(state.as_mut().unwrap())
    }
}

#[async_trait]
impl OutcomePersistence for StreamingJsonPersistence {
    async fn store_outcome(&self, outcome: &FileOutcome) -> Result<()> {
        let mut guard = self.state.lock().await;
        let state = self.ensure_initialized(&mut guard).await?;

        if state.entries_written > 0 {
            state
                .writer
                .write_all(b",")
                .await
                .context("レポートの書き込みに失敗しました")?;
        }
        state
            .writer
            .write_all(b"\n    ")
            .await
            .context("レポートの書き込みに失敗しました")?;

        let json = serde_json::to_string(outcome).context("結果のシリアライズに失敗しました")?;
        state
            .writer
            .write_all(json.as_bytes())
            .await
            .context("レポートの書き込みに失敗しました")?;
        state
            .writer
            .flush()
            .await
            .context("レポートのフラッシュに失敗しました")?;

        state.entries_written += 1;
        Ok(())
    }

    async fn finalize(&self, summary: &BatchSummary) -> Result<()> {
        let mut guard = self.state.lock().await;
        // 空バッチでもレポートファイル自体は完成させる
        let state = self.ensure_initialized(&mut guard).await?;

        state
            .writer
            .write_all(b"\n  ],\n  \"summary\": ")
            .await
            .context("レポートの書き込みに失敗しました")?;

        let json = serde_json::to_string(summary).context("集計のシリアライズに失敗しました")?;
        state
            .writer
            .write_all(json.as_bytes())
            .await
            .context("レポートの書き込みに失敗しました")?;
        state
            .writer
            .write_all(b"\n}\n")
            .await
            .context("レポートの書き込みに失敗しました")?;
        state
            .writer
            .flush()
            .await
            .context("レポートのフラッシュに失敗しました")?;

        Ok(())
    }
}
