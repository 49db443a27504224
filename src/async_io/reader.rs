// 行単位の非同期ファイル読み込み

use crate::processing::error::{ProcessingError, ProcessingResult};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// 行単位で読み進める非同期リーダー
///
/// ハンドルは開いたパイプラインが単独で所有し、共有しない。
/// ファイルは drop 時に閉じられる。
pub struct AsyncLineReader {
    path: PathBuf,
    inner: BufReader<File>,
}

impl AsyncLineReader {
    /// 読み込み用にファイルを開く
    ///
    /// 存在しないパス・権限不足・通常ファイル以外は OpenError になる。
    pub async fn open(path: &Path) -> ProcessingResult<Self> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ProcessingError::open(path, e))?;

        if !metadata.is_file() {
            return Err(ProcessingError::open(
                path,
                std::io::Error::other("通常ファイルではありません"),
            ));
        }

        let file = File::open(path)
            .await
            .map_err(|e| ProcessingError::open(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            inner: BufReader::new(file),
        })
    }

    /// 次の1行を読む
    ///
    /// 終端に達した場合は `Ok(None)` を返す。終端は値であって
    /// エラーではないので、呼び出し側は `while let` で回すだけでよい。
    /// 返される行に改行文字は含まれない。
    pub async fn read_line(&mut self) -> ProcessingResult<Option<String>> {
        let mut buf = String::new();
        let bytes_read = self
            .inner
            .read_line(&mut buf)
            .await
            .map_err(|e| ProcessingError::read(&self.path, e))?;

        if bytes_read == 0 {
            return Ok(None);
        }

        // 行末の改行（LF / CRLF）を取り除く
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }

        Ok(Some(buf))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
