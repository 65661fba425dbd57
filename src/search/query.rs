//! Search query and result schema / 搜索查询与结果定义

use serde::{Deserialize, Serialize};

use crate::models::{SourceEntry, TranslationVersion};

/// Pattern interpretation for one field / 单字段匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Literal substring / 字面子串
    Literal,
    /// Whole words, tokenized on non-alphanumeric boundaries / 整词匹配
    WholeWord,
    /// Regular expression / 正则表达式
    Regex,
}

impl Default for MatchMode {
    fn default() -> Self {
        MatchMode::Literal
    }
}

/// How the predicate treats an empty field value / 空值处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyMode {
    /// Pattern logic only / 仅按模式匹配
    Ignore,
    /// Require the field to be empty / 仅匹配空值
    OnlyEmpty,
    /// Empty values qualify in addition to pattern matches / 空值或模式命中均可
    AllowEmpty,
}

impl Default for EmptyMode {
    fn default() -> Self {
        EmptyMode::Ignore
    }
}

/// Boolean combinator joining the two field predicates / 字段谓词的布尔组合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    And,
    Or,
}

impl Default for Combinator {
    fn default() -> Self {
        Combinator::And
    }
}

/// One field's predicate / 单字段谓词
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldQuery {
    pub pattern: String,
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Predicate true when the pattern does NOT match / 取反
    #[serde(default)]
    pub negated: bool,
    #[serde(default)]
    pub empty_mode: EmptyMode,
}

impl FieldQuery {
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mode: MatchMode::Regex,
            ..Default::default()
        }
    }

    pub fn whole_word(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mode: MatchMode::WholeWord,
            ..Default::default()
        }
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn negated(mut self, yes: bool) -> Self {
        self.negated = yes;
        self
    }

    pub fn empty_mode(mut self, mode: EmptyMode) -> Self {
        self.empty_mode = mode;
        self
    }

    /// An inactive predicate is vacuously true and excluded from the
    /// combination test / 未激活谓词视为恒真，不参与组合
    pub fn is_active(&self) -> bool {
        !self.pattern.is_empty() || self.empty_mode != EmptyMode::Ignore
    }
}

/// Structured multi-field query / 结构化多字段查询
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub source: FieldQuery,
    pub translation: FieldQuery,
    /// Substring filter on context, AND-ed independently of the combinator
    /// 上下文子串过滤，独立 AND
    pub context_filter: Option<String>,
    #[serde(default)]
    pub combinator: Combinator,
}

impl SearchQuery {
    pub fn source(pattern: FieldQuery) -> Self {
        Self {
            source: pattern,
            ..Default::default()
        }
    }

    pub fn translation(pattern: FieldQuery) -> Self {
        Self {
            translation: pattern,
            ..Default::default()
        }
    }

    pub fn with_translation(mut self, pattern: FieldQuery) -> Self {
        self.translation = pattern;
        self
    }

    pub fn with_context_filter(mut self, filter: impl Into<String>) -> Self {
        self.context_filter = Some(filter.into());
        self
    }

    pub fn combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }
}

/// Byte-offset span of one match, for UI highlighting only / 命中区间（高亮用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// One qualifying entry / 一条搜索结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub entry: SourceEntry,
    /// Set when the translation field contributed to the match
    /// 翻译字段参与命中时填充
    pub matched_version: Option<TranslationVersion>,
    /// Latest version regardless of what matched, for display
    /// 最新版本（展示用）
    pub latest_version: Option<TranslationVersion>,
    pub source_spans: Vec<MatchSpan>,
    pub translation_spans: Vec<MatchSpan>,
}
