//! Engine error taxonomy / 引擎错误类型
//!
//! Every fallible engine operation returns `EngineResult<T>`. The UI layer
//! maps these variants to user-facing messages; the engine never formats
//! dialogs or status text itself.

use thiserror::Error;

/// Engine-level failure / 引擎级错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// An entry with the same (source_text, context) pair already exists
    /// 相同 (source_text, context) 的条目已存在
    #[error("duplicate entry: source_text={source_text:?}, context={context:?}")]
    DuplicateEntry {
        source_text: String,
        context: Option<String>,
    },

    /// The entry already has a live version with identical text
    /// 该条目已有相同文本的版本
    #[error("duplicate version text for entry {entry_id}")]
    DuplicateVersion { entry_id: i64 },

    /// Entry or version not found / 条目或版本不存在
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Malformed regex in a search query / 搜索查询中的非法正则
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    /// Underlying SQLite failure; any open transaction was rolled back
    /// 底层 SQLite 错误，未提交事务已回滚
    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    /// Cooperative cancellation of a long-running scan or import
    /// 长时间扫描/导入被取消
    #[error("operation cancelled")]
    Cancelled,
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
