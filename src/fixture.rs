use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// テスト入力ファイル群の生成
pub struct FixtureGenerator;

impl FixtureGenerator {
    /// 決定的なテスト入力ファイルを作成する
    ///
    /// `test_file_<i>.txt` を `num_files` 個作り、それぞれに
    /// `lines_per_file` 行を書き込む。内容はファイル番号と行番号
    /// のみから決まるので、同じ引数なら常に同じツリーができる。
    pub fn create_test_files(
        directory: &Path,
        num_files: usize,
        lines_per_file: usize,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(directory)
            .with_context(|| format!("ディレクトリを作成できません: {}", directory.display()))?;

        let mut created = Vec::with_capacity(num_files);
        for i in 0..num_files {
            let file_path = directory.join(format!("test_file_{i}.txt"));

            let mut content = String::new();
            for j in 0..lines_per_file {
                content.push_str(&format!("This is line {j} in file {i}\n"));
            }

            fs::write(&file_path, content)
                .with_context(|| format!("ファイルを作成できません: {}", file_path.display()))?;
            created.push(file_path);
        }

        Ok(created)
    }
}
