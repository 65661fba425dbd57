//! Field predicate matcher / 字段谓词匹配器
//!
//! One matcher implementation serves both the source and the translation
//! field: literal / whole-word / regex, optionally case-insensitive,
//! optionally negated, with empty-value handling layered on top. Compiled
//! once per query; a malformed regex fails the whole search call with
//! `InvalidPattern` before any entry is examined.

use regex::RegexBuilder;

use super::query::{EmptyMode, FieldQuery, MatchMode, MatchSpan};
use crate::error::{EngineError, EngineResult};

/// Compiled single-field matcher / 编译后的单字段匹配器
#[derive(Debug)]
pub struct FieldMatcher {
    kind: MatcherKind,
    negated: bool,
    empty_mode: EmptyMode,
}

#[derive(Debug)]
enum MatcherKind {
    /// Empty pattern with default flags; vacuously true / 未激活
    Inactive,
    Literal {
        needle: String,
        case_sensitive: bool,
    },
    WholeWord {
        needle: String,
        case_sensitive: bool,
    },
    Regex(regex::Regex),
}

impl FieldMatcher {
    /// Compile a field query / 编译字段谓词
    pub fn compile(query: &FieldQuery) -> EngineResult<Self> {
        let kind = if !query.is_active() || query.pattern.is_empty() {
            MatcherKind::Inactive
        } else {
            match query.mode {
                MatchMode::Literal => MatcherKind::Literal {
                    needle: query.pattern.clone(),
                    case_sensitive: query.case_sensitive,
                },
                MatchMode::WholeWord => MatcherKind::WholeWord {
                    needle: query.pattern.clone(),
                    case_sensitive: query.case_sensitive,
                },
                MatchMode::Regex => {
                    let re = RegexBuilder::new(&query.pattern)
                        .case_insensitive(!query.case_sensitive)
                        .build()
                        .map_err(|e| EngineError::InvalidPattern(e.to_string()))?;
                    MatcherKind::Regex(re)
                }
            }
        };
        Ok(Self {
            kind,
            negated: query.negated,
            empty_mode: query.empty_mode,
        })
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.kind, MatcherKind::Inactive) || self.empty_mode != EmptyMode::Ignore
    }

    /// Evaluate the predicate; `None` means the field has no value (an
    /// entry with zero live versions) / 评估谓词，None 表示字段无值
    pub fn matches(&self, value: Option<&str>) -> bool {
        let text = value.unwrap_or("");
        // Negation inverts the pattern result, then the empty mode is
        // composed on top / 取反作用于模式结果，空值模式再组合
        let pattern_hit = self.pattern_matches(text) != self.negated;
        match self.empty_mode {
            EmptyMode::Ignore => pattern_hit,
            EmptyMode::OnlyEmpty => text.is_empty(),
            EmptyMode::AllowEmpty => text.is_empty() || pattern_hit,
        }
    }

    /// Match spans for highlighting; negated predicates have nothing to
    /// highlight / 高亮区间，取反时无可高亮内容
    pub fn spans(&self, text: &str) -> Vec<MatchSpan> {
        if self.negated {
            return Vec::new();
        }
        match &self.kind {
            MatcherKind::Inactive => Vec::new(),
            MatcherKind::Literal {
                needle,
                case_sensitive,
            } => literal_spans(text, needle, *case_sensitive),
            MatcherKind::WholeWord {
                needle,
                case_sensitive,
            } => word_spans(text, needle, *case_sensitive),
            MatcherKind::Regex(re) => re
                .find_iter(text)
                .map(|m| MatchSpan {
                    start: m.start(),
                    end: m.end(),
                })
                .collect(),
        }
    }

    fn pattern_matches(&self, text: &str) -> bool {
        match &self.kind {
            MatcherKind::Inactive => true,
            MatcherKind::Literal {
                needle,
                case_sensitive,
            } => !literal_spans(text, needle, *case_sensitive).is_empty(),
            MatcherKind::WholeWord {
                needle,
                case_sensitive,
            } => !word_spans(text, needle, *case_sensitive).is_empty(),
            MatcherKind::Regex(re) => re.is_match(text),
        }
    }
}

/// All literal occurrences, byte offsets into the original text
/// 字面子串的全部命中位置（原文字节偏移）
fn literal_spans(text: &str, needle: &str, case_sensitive: bool) -> Vec<MatchSpan> {
    if needle.is_empty() {
        return Vec::new();
    }
    if case_sensitive {
        return text
            .match_indices(needle)
            .map(|(start, m)| MatchSpan {
                start,
                end: start + m.len(),
            })
            .collect();
    }

    // Case-insensitive scan that keeps offsets valid in the original
    // string: fold char by char instead of lowercasing the whole haystack
    // 逐字符折叠大小写，保持原文偏移有效
    let needle_folded: Vec<char> = needle.chars().flat_map(|c| c.to_lowercase()).collect();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();

    let mut start_pos = 0;
    while start_pos < chars.len() {
        let mut folded_idx = 0;
        let mut end_byte = None;
        for &(byte_idx, c) in &chars[start_pos..] {
            let mut matched = true;
            for lc in c.to_lowercase() {
                if folded_idx >= needle_folded.len() || needle_folded[folded_idx] != lc {
                    matched = false;
                    break;
                }
                folded_idx += 1;
            }
            if !matched {
                break;
            }
            if folded_idx == needle_folded.len() {
                end_byte = Some(byte_idx + c.len_utf8());
                break;
            }
        }
        match end_byte {
            Some(end) => {
                spans.push(MatchSpan {
                    start: chars[start_pos].0,
                    end,
                });
                // Non-overlapping, like the case-sensitive path / 与大小写敏感路径一致，不重叠
                while start_pos < chars.len() && chars[start_pos].0 < end {
                    start_pos += 1;
                }
            }
            None => start_pos += 1,
        }
    }
    spans
}

/// Whole-word occurrences: the text is tokenized on non-alphanumeric
/// boundaries and each token is compared in full / 整词命中，按非字母数字边界分词
fn word_spans(text: &str, needle: &str, case_sensitive: bool) -> Vec<MatchSpan> {
    if needle.is_empty() {
        return Vec::new();
    }
    let wanted = if case_sensitive {
        needle.to_string()
    } else {
        needle.to_lowercase()
    };

    let mut spans = Vec::new();
    let mut token_start: Option<usize> = None;
    let mut push_token = |start: usize, end: usize, spans: &mut Vec<MatchSpan>| {
        let token = &text[start..end];
        let token = if case_sensitive {
            token.to_string()
        } else {
            token.to_lowercase()
        };
        if token == wanted {
            spans.push(MatchSpan { start, end });
        }
    };

    for (byte_idx, c) in text.char_indices() {
        if c.is_alphanumeric() {
            if token_start.is_none() {
                token_start = Some(byte_idx);
            }
        } else if let Some(start) = token_start.take() {
            push_token(start, byte_idx, &mut spans);
        }
    }
    if let Some(start) = token_start {
        push_token(start, text.len(), &mut spans);
    }
    spans
}
