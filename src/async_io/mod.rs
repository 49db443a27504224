// 非同期ファイルI/Oアダプタ
//
// ブロッキングになりうるファイル操作は tokio::fs 経由で発行し、
// ランタイムの有界ブロッキングプールへ退避される。スケジューリング
// ループが単一の遅いディスク操作で停止することはない。

pub mod reader;
pub mod writer;

pub use reader::AsyncLineReader;
pub use writer::AsyncLineWriter;
