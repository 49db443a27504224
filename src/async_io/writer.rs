// バッファ付き非同期ファイル書き込み

use crate::processing::error::{ProcessingError, ProcessingResult};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// 行単位で書き出す非同期ライター
///
/// ハンドルは作成したパイプラインが単独で所有する。
/// 書き込んだ内容は `commit` が呼ばれるまで永続化の保証がない。
/// `commit` は self を消費するため、コミット済みハンドルへの
/// 書き込みは型レベルで不可能になっている。
pub struct AsyncLineWriter {
    path: PathBuf,
    inner: BufWriter<File>,
}

impl AsyncLineWriter {
    /// 書き込み用にファイルを作成する（既存ファイルは切り詰める）
    pub async fn create(path: &Path) -> ProcessingResult<Self> {
        let file = File::create(path)
            .await
            .map_err(|e| ProcessingError::open(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
        })
    }

    /// 1行書き込む。行末には改行が付与される
    ///
    /// 書き込んだバイト数（改行含む）を返す。
    pub async fn write_line(&mut self, line: &str) -> ProcessingResult<usize> {
        self.inner
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ProcessingError::write(&self.path, e))?;
        self.inner
            .write_all(b"\n")
            .await
            .map_err(|e| ProcessingError::write(&self.path, e))?;

        Ok(line.len() + 1)
    }

    /// 耐久コミット: フラッシュとディスク同期を行い、ハンドルを閉じる
    ///
    /// 成功経路・失敗経路の両方から必ず呼ぶこと。バッファに残っている
    /// 書き込み済みデータをここで確実にディスクへ届ける。フラッシュ
    /// せずに閉じると出力ファイルが黙って切り詰められることになる。
    pub async fn commit(mut self) -> ProcessingResult<()> {
        self.inner
            .flush()
            .await
            .map_err(|e| ProcessingError::write(&self.path, e))?;
        self.inner
            .get_ref()
            .sync_all()
            .await
            .map_err(|e| ProcessingError::write(&self.path, e))?;

        // ファイルは self の drop で閉じられる
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_commit() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("output.txt");

        let mut writer = AsyncLineWriter::create(&file_path).await.unwrap();
        let written = writer.write_line("HELLO").await.unwrap();
        assert_eq!(written, 6);
        writer.write_line("WORLD").await.unwrap();
        writer.commit().await.unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "HELLO\nWORLD\n");
    }

    #[tokio::test]
    async fn test_commit_flushes_partial_output() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("output.txt");

        // 失敗経路を模して、途中までの書き込みをコミットする
        let mut writer = AsyncLineWriter::create(&file_path).await.unwrap();
        writer.write_line("ONLY LINE").await.unwrap();
        writer.commit().await.unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "ONLY LINE\n");
    }

    #[tokio::test]
    async fn test_create_in_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("no_such_dir").join("output.txt");

        let result = AsyncLineWriter::create(&file_path).await;
        assert!(matches!(result, Err(ProcessingError::OpenError { .. })));
    }

    #[tokio::test]
    async fn test_create_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("output.txt");
        fs::write(&file_path, "stale content\nmore stale\n").unwrap();

        let mut writer = AsyncLineWriter::create(&file_path).await.unwrap();
        writer.write_line("FRESH").await.unwrap();
        writer.commit().await.unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "FRESH\n");
    }
}
