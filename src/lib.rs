// テキストファイル一括変換ライブラリ
// 入力ディレクトリのファイル群を行単位で変換し、同時実行数を
// 制限しながら並列に出力ツリーへ書き出す

pub mod async_io;
pub mod file_scanner;
pub mod fixture;
pub mod processing;
pub mod transform;
pub mod verify;

pub use file_scanner::FileScanner;
pub use fixture::FixtureGenerator;
pub use processing::{
    BatchProcessor, BatchResult, BatchSummary, ConcurrencyGovernor, ConsoleProgressReporter,
    DefaultProcessorConfig, FileOutcome, FileState, FileStateTracker, MemoryOutcomePersistence,
    NoOpProgressReporter, OutcomePersistence, ProcessingError, ProcessingResult, ProcessorConfig,
    ProgressReporter, StreamingJsonPersistence,
};
pub use transform::{LineTransform, UppercaseTransform};
pub use verify::{OutputVerifier, VerificationReport};
