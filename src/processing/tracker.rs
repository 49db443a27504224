// バッチ内のファイル状態追跡

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// ファイルのライフサイクル状態
///
/// Pending はトラッカーに存在しないことで表現される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    InProgress,
    Completed,
    Failed,
}

/// `try_begin` の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// 未処理のパス。InProgress に遷移済みで、処理を開始してよい
    Proceed,
    /// 別のパイプラインが処理中
    SkipInProgress,
    /// 既に終端状態に達している
    SkipFinished { success: bool },
}

/// パスごとの処理状態を追跡し、同一バッチ内での二重処理を防ぐ
///
/// 複数のパイプラインタスクから並行に呼ばれるため、状態は
/// ミューテックスで保護する。マルチスレッドランタイム上では
/// 協調スケジューラの原子性に頼れないので、明示的な排他が必要になる。
/// ロック保持中に待機は発生しないため std::sync::Mutex を使う。
#[derive(Debug, Default)]
pub struct FileStateTracker {
    states: Mutex<HashMap<PathBuf, FileState>>,
}

impl FileStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// パスの処理開始を試みる
    ///
    /// 未知のパスであれば InProgress を記録して `Proceed` を返す。
    /// 処理中・処理済みのパスは状態を変えずにスキップ判定を返す。
    /// 判定と遷移はひとつのロック区間で行われ、原子的に見える。
    pub fn try_begin(&self, path: &Path) -> AdmissionDecision {
        let mut states = self.states.lock().unwrap();

        match states.get(path) {
            Some(FileState::InProgress) => AdmissionDecision::SkipInProgress,
            Some(FileState::Completed) => AdmissionDecision::SkipFinished { success: true },
            Some(FileState::Failed) => AdmissionDecision::SkipFinished { success: false },
            None => {
                states.insert(path.to_path_buf(), FileState::InProgress);
                AdmissionDecision::Proceed
            }
        }
    }

    /// 終端状態への遷移
    ///
    /// InProgress 以外のパスに対する呼び出しは何もしない。
    /// 中断経路からの重複した完了通知を許容するための防御的な仕様。
    pub fn complete(&self, path: &Path, success: bool) {
        let mut states = self.states.lock().unwrap();

        if let Some(state) = states.get_mut(path) {
            if *state == FileState::InProgress {
                *state = if success {
                    FileState::Completed
                } else {
                    FileState::Failed
                };
            }
        }
    }

    /// パスの現在状態を取得（未知のパスは None = Pending）
    pub fn state_of(&self, path: &Path) -> Option<FileState> {
        self.states.lock().unwrap().get(path).copied()
    }

    /// 処理中のファイル数
    pub fn in_progress_count(&self) -> usize {
        self.states
            .lock()
            .unwrap()
            .values()
            .filter(|state| **state == FileState::InProgress)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_try_begin_transitions() {
        let tracker = FileStateTracker::new();
        let path = Path::new("/in/a.txt");

        assert_eq!(tracker.state_of(path), None);
        assert_eq!(tracker.try_begin(path), AdmissionDecision::Proceed);
        assert_eq!(tracker.state_of(path), Some(FileState::InProgress));

        // 処理中のパスはスキップ判定になる
        assert_eq!(tracker.try_begin(path), AdmissionDecision::SkipInProgress);

        tracker.complete(path, true);
        assert_eq!(tracker.state_of(path), Some(FileState::Completed));
        assert_eq!(
            tracker.try_begin(path),
            AdmissionDecision::SkipFinished { success: true }
        );
    }

    #[test]
    fn test_failed_state_recorded() {
        let tracker = FileStateTracker::new();
        let path = Path::new("/in/b.txt");

        assert_eq!(tracker.try_begin(path), AdmissionDecision::Proceed);
        tracker.complete(path, false);

        assert_eq!(tracker.state_of(path), Some(FileState::Failed));
        assert_eq!(
            tracker.try_begin(path),
            AdmissionDecision::SkipFinished { success: false }
        );
    }

    #[test]
    fn test_complete_is_noop_outside_in_progress() {
        let tracker = FileStateTracker::new();
        let path = Path::new("/in/c.txt");

        // 未知のパスへの完了通知は無視される
        tracker.complete(path, true);
        assert_eq!(tracker.state_of(path), None);

        tracker.try_begin(path);
        tracker.complete(path, true);

        // 終端状態に達した後の重複通知は状態を変えない
        tracker.complete(path, false);
        assert_eq!(tracker.state_of(path), Some(FileState::Completed));
    }

    #[test]
    fn test_in_progress_count() {
        let tracker = FileStateTracker::new();

        tracker.try_begin(Path::new("/in/a.txt"));
        tracker.try_begin(Path::new("/in/b.txt"));
        assert_eq!(tracker.in_progress_count(), 2);

        tracker.complete(Path::new("/in/a.txt"), true);
        assert_eq!(tracker.in_progress_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_try_begin_admits_once() {
        let tracker = Arc::new(FileStateTracker::new());
        let path = PathBuf::from("/in/contended.txt");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = tracker.clone();
            let path = path.clone();
            handles.push(tokio::spawn(async move { tracker.try_begin(&path) }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() == AdmissionDecision::Proceed {
                admitted += 1;
            }
        }

        // 並行に競合しても開始できるのは一度だけ
        assert_eq!(admitted, 1);
    }
}
