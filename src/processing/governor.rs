// 同時実行数の流入制御

use super::error::{ProcessingError, ProcessingResult};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// 同時に実行できるファイルパイプライン数を制限する流入制御プリミティブ
///
/// ファイルの識別には関与せず、純粋な容量制御のみを行う。
/// tokioのセマフォはFIFOで許可を払い出すため、待機者が無期限に
/// 飢餓状態になることはない。
#[derive(Debug)]
pub struct ConcurrencyGovernor {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
}

impl ConcurrencyGovernor {
    /// 最大同時実行数を指定して作成する
    ///
    /// `max_concurrency == 0` は構築時の設定エラーとなり、
    /// 実行時エラーには持ち越さない。
    pub fn new(max_concurrency: usize) -> ProcessingResult<Self> {
        if max_concurrency == 0 {
            return Err(ProcessingError::configuration(
                "最大同時実行数は1以上である必要があります",
            ));
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        })
    }

    /// 許可をひとつ取得する。容量いっぱいの場合は空きが出るまで待機する
    ///
    /// 返された `GovernorPermit` は drop 時に無条件で許可を返却する。
    pub async fn acquire(&self) -> ProcessingResult<GovernorPermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| {
                ProcessingError::parallel_execution(format!("実行許可の取得に失敗しました: {e}"))
            })?;

        Ok(GovernorPermit { _permit: permit })
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// 現在払い出し可能な許可数
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// 取得済みの実行許可
///
/// drop されたとき（正常終了・エラーのどちらでも）に許可が返却される。
#[derive(Debug)]
pub struct GovernorPermit {
    _permit: OwnedSemaphorePermit,
}
