//! Shared data models / 共享数据模型
//!
//! All records returned by the engine are immutable value snapshots.
//! Mutation flows back in only through explicit store calls
//! (`add_version`, `delete_version`, ...), never by aliasing store internals.

use serde::{Deserialize, Serialize};

/// A unique source text requiring translation / 待翻译的唯一源文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SourceEntry {
    /// Opaque identifier, assigned on creation, never reused / 创建时分配，永不复用
    pub id: i64,
    pub source_text: String,
    /// Optional disambiguator; `None` is distinct from `Some("")` / 可选上下文
    pub context: Option<String>,
    /// RFC 3339 creation timestamp / 创建时间
    pub created_at: String,
}

/// One historical translation of an entry / 条目的一个历史翻译版本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TranslationVersion {
    pub entry_id: i64,
    /// Per-entry sequence number, strictly increasing, gaps allowed after
    /// deletion but values never reused / 条目内严格递增，删除留空洞，永不复用
    pub version_id: i64,
    pub text: String,
    /// Free-form attribution: "manual", "imported-file", "machine", "memory"
    pub source_label: String,
    pub created_at: String,
}

/// Sort key for browse-mode listing / 浏览模式排序键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ById,
    BySource,
    ByTranslation,
    ByContext,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::ById
    }
}

/// One record fed to the bulk import pipeline / 批量导入的单条记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub source_text: String,
    pub context: Option<String>,
    pub translated_text: String,
    pub source_label: String,
}

impl ImportRecord {
    pub fn new(
        source_text: impl Into<String>,
        context: Option<&str>,
        translated_text: impl Into<String>,
        source_label: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            context: context.map(|s| s.to_string()),
            translated_text: translated_text.into(),
            source_label: source_label.into(),
        }
    }
}

/// Outcome summary of one import batch / 一次批量导入的统计结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub inserted_entries: u64,
    pub inserted_versions: u64,
    pub skipped_duplicates: u64,
}

/// One exported row: entry plus its latest translation / 导出行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub source_text: String,
    pub context: Option<String>,
    pub latest_translated_text: String,
}
