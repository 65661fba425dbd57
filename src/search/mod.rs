//! Search module - only provides search capabilities (primitives), does not control flow / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - query:   value objects describing what to match / 查询值对象
//! - matcher: one compiled predicate shared by both fields / 字段共用的谓词
//! - engine:  full-store evaluation, id-ordered, cancellable / 全量扫描求值

mod engine;
mod matcher;
mod query;

pub use engine::SearchEngine;
pub use matcher::FieldMatcher;
pub use query::{
    Combinator, EmptyMode, FieldQuery, MatchMode, MatchSpan, SearchQuery, SearchResult,
};
