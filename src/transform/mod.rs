// 行変換の抽象化
//
// パイプラインは行単位の変換契約のみに依存する。変換はトレイトで
// 差し替え可能だが、このクレートが提供する実装は大文字変換のみ。

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

pub mod uppercase;

pub use uppercase::UppercaseTransform;

/// 1行を変換するトレイト
///
/// 実装は純粋であること: 同じ入力行には常に同じ出力行を返す。
/// 行は改行文字を含まない形で受け渡しされる。
#[automock]
#[async_trait]
pub trait LineTransform: Send + Sync {
    /// 1行を変換する
    async fn transform_line(&self, line: &str) -> Result<String>;
}
