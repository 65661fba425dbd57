//! Scan progress and cancellation state / 扫描进度与取消状态
//!
//! Shared by the long-running operations (bulk import, fuzzy suggestion
//! scan, full-store search) so the UI can poll progress and request
//! cooperative cancellation. Cancellation is checked between record-level
//! steps; a transaction that has not committed yet is simply discarded.

use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Progress snapshot / 进度快照
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub is_running: bool,
    pub is_done: bool,
    pub processed: u64,
    pub error: Option<String>,
    pub last_done_time: Option<i64>,
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self {
            is_running: false,
            is_done: true,
            processed: 0,
            error: None,
            last_done_time: None,
        }
    }
}

/// Scan state management / 扫描状态管理
pub struct ScanState {
    running: AtomicBool,
    processed: AtomicU64,
    cancel_flag: AtomicBool,
    progress: RwLock<ScanProgress>,
}

impl ScanState {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            processed: AtomicU64::new(0),
            cancel_flag: AtomicBool::new(false),
            progress: RwLock::new(ScanProgress::default()),
        }
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        self.cancel_flag.store(false, Ordering::SeqCst);
        self.processed.store(0, Ordering::SeqCst);
        let mut progress = self.progress.write();
        progress.is_running = true;
        progress.is_done = false;
        progress.processed = 0;
        progress.error = None;
    }

    /// Record `n` processed units / 记录已处理数量
    pub fn advance(&self, n: u64) {
        let count = self.processed.fetch_add(n, Ordering::SeqCst) + n;
        self.progress.write().processed = count;
    }

    pub fn finish(&self, error: Option<String>) {
        self.running.store(false, Ordering::SeqCst);
        let mut progress = self.progress.write();
        progress.is_running = false;
        progress.is_done = error.is_none();
        progress.error = error;
        progress.last_done_time = Some(Utc::now().timestamp());
    }

    /// Request cooperative cancellation / 请求取消
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn get_progress(&self) -> ScanProgress {
        self.progress.read().clone()
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let state = ScanState::new();
        assert!(!state.is_running());

        state.start();
        assert!(state.is_running());
        assert!(!state.is_cancelled());

        state.advance(3);
        state.advance(2);
        assert_eq!(state.get_progress().processed, 5);

        state.finish(None);
        assert!(!state.is_running());
        assert!(state.get_progress().is_done);
    }

    #[test]
    fn test_cancel_flag() {
        let state = ScanState::new();
        state.start();
        state.cancel();
        assert!(state.is_cancelled());

        // A new run clears the flag / 新一轮扫描清除取消标记
        state.start();
        assert!(!state.is_cancelled());
    }
}
