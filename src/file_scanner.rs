use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 入力ディレクトリ直下のファイルを列挙する
pub struct FileScanner;

impl FileScanner {
    /// ディレクトリ直下の通常ファイルを列挙する（サブディレクトリは対象外）
    pub fn scan_directory(directory: &Path) -> Result<Vec<PathBuf>> {
        let mut file_paths = Vec::new();

        for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
            let entry = entry?;

            if entry.file_type().is_file() {
                file_paths.push(entry.path().to_path_buf());
            }
        }

        file_paths.sort(); // 一貫した順序でディスパッチする
        Ok(file_paths)
    }
}
