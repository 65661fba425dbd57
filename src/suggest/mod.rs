//! Suggestion subsystem / 建议子系统
//!
//! - similarity: pure similarity scoring / 纯相似度计算
//! - engine: exact + fuzzy candidate retrieval / 精确与模糊候选检索

mod engine;
mod similarity;

pub use engine::{SuggestEngine, Suggestion};
pub use similarity::similarity;
