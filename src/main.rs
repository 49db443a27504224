use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use text_transform::{
    BatchProcessor, ConsoleProgressReporter, DefaultProcessorConfig, FixtureGenerator,
    MemoryOutcomePersistence, OutcomePersistence, OutputVerifier, ProcessorConfig,
    StreamingJsonPersistence, UppercaseTransform,
};

/// Concurrent line-by-line text file transformer
#[derive(Parser)]
#[command(name = "text_transform")]
#[command(about = "Transforms a directory of text files concurrently, one uppercased line at a time")]
#[command(version)]
struct Cli {
    /// Input directory containing the files to process
    #[arg(default_value = "test_input")]
    input_dir: PathBuf,

    /// Output directory for processed files
    #[arg(default_value = "test_output")]
    output_dir: PathBuf,

    /// Number of fixture files to generate before processing
    #[arg(long, default_value = "10")]
    files: usize,

    /// Lines per generated fixture file
    #[arg(long, default_value = "100")]
    lines: usize,

    /// Maximum number of files processed concurrently
    #[arg(short, long, default_value = "5")]
    concurrency: usize,

    /// Optional path for a JSON batch report
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Process existing files instead of generating fixtures
    #[arg(long)]
    no_fixtures: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("🚀 テキスト一括変換ツール - 並列処理版");
    println!("📂 入力ディレクトリ: {}", cli.input_dir.display());
    println!("📂 出力ディレクトリ: {}", cli.output_dir.display());

    if !cli.no_fixtures {
        FixtureGenerator::create_test_files(&cli.input_dir, cli.files, cli.lines)?;
        println!(
            "📝 テストファイルを作成しました ({}ファイル x {}行)",
            cli.files, cli.lines
        );
    }

    let issues = match &cli.report {
        Some(report_path) => {
            println!("📄 レポート出力先: {}", report_path.display());
            run_batch(&cli, StreamingJsonPersistence::new(report_path)).await?
        }
        None => run_batch(&cli, MemoryOutcomePersistence::new()).await?,
    };

    if issues > 0 {
        println!("⚠️  検証で{issues}件の問題が見つかりました");
        std::process::exit(1);
    }

    println!("✅ 検証を通過しました");
    Ok(())
}

/// バッチを実行して検証し、見つかった問題数を返す
async fn run_batch<P>(cli: &Cli, persistence: P) -> Result<usize>
where
    P: OutcomePersistence + 'static,
{
    let config = DefaultProcessorConfig::new(cli.input_dir.clone(), cli.output_dir.clone())
        .with_max_concurrency(cli.concurrency);

    let processor = BatchProcessor::new(
        UppercaseTransform::new(),
        config,
        ConsoleProgressReporter::new(),
        persistence,
    )?;

    let start_time = std::time::Instant::now();
    let result = processor.process_directory().await?;
    let elapsed = start_time.elapsed();

    println!("\n📊 処理結果:");
    println!("   - 対象ファイル数: {}", result.summary.total_files);
    println!("   - 成功: {}", result.summary.success_count);
    println!("   - 失敗: {}", result.summary.error_count);
    println!("   - スキップ: {}", result.summary.skipped_count);
    println!("   - 最大同時実行数: {}", processor.config().max_concurrency());
    println!("   - 総処理時間: {:.2}秒", elapsed.as_secs_f64());

    println!("\n🔍 出力ツリーを検証します...");
    let report = OutputVerifier::verify(&cli.input_dir, &cli.output_dir)?;
    println!("   - 照合ファイル数: {}", report.checked_files);
    println!("   - 出力欠落: {}", report.missing_outputs);
    println!("   - 行数不一致: {}", report.line_count_mismatches);
    println!("   - 内容不一致: {}", report.content_mismatches);

    Ok(report.issue_count())
}
