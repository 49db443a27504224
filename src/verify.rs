use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// 出力ツリー検証の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// 照合した入力ファイル数
    pub checked_files: usize,
    /// 出力ファイルが存在しなかった数
    pub missing_outputs: usize,
    /// 行数が一致しなかった数
    pub line_count_mismatches: usize,
    /// 内容が一致しなかった数
    pub content_mismatches: usize,
}

impl VerificationReport {
    /// 見つかった問題の総数
    pub fn issue_count(&self) -> usize {
        self.missing_outputs + self.line_count_mismatches + self.content_mismatches
    }
}

/// 入力ツリーと出力ツリーの突き合わせ検証
pub struct OutputVerifier;

impl OutputVerifier {
    /// 入力ディレクトリの各ファイルについて、対応する
    /// `processed_<name>` が存在し、行数が等しく、各行が
    /// 大文字変換後の入力行と一致することを確認する。
    pub fn verify(input_dir: &Path, output_dir: &Path) -> Result<VerificationReport> {
        let mut report = VerificationReport::default();

        let entries = fs::read_dir(input_dir).with_context(|| {
            format!("入力ディレクトリを読めません: {}", input_dir.display())
        })?;

        for entry in entries {
            let entry = entry?;
            let input_path = entry.path();
            if !input_path.is_file() {
                continue;
            }
            report.checked_files += 1;

            let mut output_name = OsString::from("processed_");
            output_name.push(entry.file_name());
            let output_path = output_dir.join(output_name);

            if !output_path.is_file() {
                report.missing_outputs += 1;
                continue;
            }

            let input_content = fs::read_to_string(&input_path).with_context(|| {
                format!("入力ファイルを読めません: {}", input_path.display())
            })?;
            let output_content = fs::read_to_string(&output_path).with_context(|| {
                format!("出力ファイルを読めません: {}", output_path.display())
            })?;

            let input_lines: Vec<&str> = input_content.lines().collect();
            let output_lines: Vec<&str> = output_content.lines().collect();

            if input_lines.len() != output_lines.len() {
                report.line_count_mismatches += 1;
                continue;
            }

            let mismatch = input_lines
                .iter()
                .zip(output_lines.iter())
                .any(|(input, output)| *output != input.to_uppercase());
            if mismatch {
                report.content_mismatches += 1;
            }
        }

        Ok(report)
    }
}
