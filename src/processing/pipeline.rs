// 単一ファイルのパイプライン実行
//
// 1ファイル分の 許可取得 → 読み込み → 変換 → 書き込み → 耐久コミット
// を担う。失敗の影響範囲はそのファイルに閉じる。

use super::error::{ProcessingError, ProcessingResult};
use super::governor::ConcurrencyGovernor;
use super::reporting::ProgressReporter;
use super::tracker::FileStateTracker;
use super::types::FileOutcome;
use crate::async_io::{AsyncLineReader, AsyncLineWriter};
use crate::transform::LineTransform;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 入力パスに対応する出力パスを導出する
///
/// `<dir>/<name>` の出力は `<output_dir>/processed_<name>` になる。
pub fn output_path_for(input_path: &Path, output_dir: &Path) -> ProcessingResult<PathBuf> {
    let name = input_path.file_name().ok_or_else(|| {
        ProcessingError::open(
            input_path,
            std::io::Error::other("ファイル名を取得できません"),
        )
    })?;

    let mut output_name = OsString::from("processed_");
    output_name.push(name);
    Ok(output_dir.join(output_name))
}

/// 単一ファイルを処理し、終端結果を返す
///
/// トラッカーには呼び出し前に InProgress が記録されていること。
/// どの経路を通っても終端状態の記録と許可の返却が行われ、
/// エラーはここで吸収されて `FileOutcome` に変換される。
pub async fn process_single_file<T, R>(
    input_path: PathBuf,
    output_dir: PathBuf,
    transform: Arc<T>,
    governor: Arc<ConcurrencyGovernor>,
    tracker: Arc<FileStateTracker>,
    reporter: Arc<R>,
) -> FileOutcome
where
    T: LineTransform,
    R: ProgressReporter,
{
    let result = execute(&input_path, &output_dir, transform.as_ref(), &governor, &tracker).await;

    match result {
        Ok(()) => FileOutcome {
            file_path: input_path,
            success: true,
            error: None,
        },
        Err(error) => {
            reporter
                .report_error(&input_path.display().to_string(), &error.to_string())
                .await;
            FileOutcome {
                file_path: input_path,
                success: false,
                error: Some(error.to_string()),
            }
        }
    }
}

/// 許可の取得から終端状態の記録までを行う
async fn execute<T>(
    input_path: &Path,
    output_dir: &Path,
    transform: &T,
    governor: &ConcurrencyGovernor,
    tracker: &FileStateTracker,
) -> ProcessingResult<()>
where
    T: LineTransform,
{
    match governor.acquire().await {
        Ok(permit) => {
            let result = run_pipeline(input_path, output_dir, transform).await;
            // 許可を保持したまま終端状態を記録する
            tracker.complete(input_path, result.is_ok());
            drop(permit);
            result
        }
        Err(error) => {
            tracker.complete(input_path, false);
            Err(error)
        }
    }
}

/// 読み込み・変換・書き込みと耐久コミット
///
/// 変換ループの失敗は値として受け、フラッシュとクローズを必ず通す。
/// 失敗時点までに書き込めた行はディスクへ届き、黙って失われることはない。
async fn run_pipeline<T>(input_path: &Path, output_dir: &Path, transform: &T) -> ProcessingResult<()>
where
    T: LineTransform,
{
    let mut reader = AsyncLineReader::open(input_path).await?;
    let output_path = output_path_for(input_path, output_dir)?;
    let mut writer = AsyncLineWriter::create(&output_path).await?;

    let loop_result = copy_lines(&mut reader, &mut writer, transform).await;
    let commit_result = writer.commit().await;
    // 入力ハンドルは drop で閉じる
    drop(reader);

    loop_result?;
    commit_result
}

async fn copy_lines<T>(
    reader: &mut AsyncLineReader,
    writer: &mut AsyncLineWriter,
    transform: &T,
) -> ProcessingResult<()>
where
    T: LineTransform,
{
    let input_path = reader.path().to_path_buf();

    while let Some(line) = reader.read_line().await? {
        let transformed = transform
            .transform_line(&line)
            .await
            .map_err(|e| ProcessingError::transform(&input_path, e))?;
        writer.write_line(&transformed).await?;
    }

    Ok(())
}
